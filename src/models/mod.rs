//! Domain models shared by the repository, the controller, and the UI.
//!
//! Contains the contract record shape, its display projection, the derived
//! market statistics, list filtering, and the staged creation form.

pub mod address;
pub mod filter;
pub mod form;
pub mod stats;
pub mod trade;

pub use address::{Address, InvalidAddress};
pub use filter::{SideFilter, TradeFilter, USER_HISTORY_LIMIT, user_history};
pub use form::{Pair, TradeForm, new_trade_id};
pub use stats::{FALLBACK_AVG_PRICE, MarketStats, PLACEHOLDER_PRICE_CHANGE};
pub use trade::{BusinessData, TradeData, TradeSide, TradeStatus};
