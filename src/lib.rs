//! MEV Shield trading front end.
//!
//! Lets a connected wallet submit trade intents whose amount is encrypted
//! with fully homomorphic encryption before it reaches the contract, so it
//! cannot be front-run from the mempool, and later request an on-chain
//! verified decryption of that amount. The contract, the confidential-compute
//! service, and the wallet are reached through the traits in [`client`];
//! [`simulation`] provides an in-process implementation of all three.

pub mod client;
pub mod config;
pub mod controller;
pub mod error;
pub mod lifecycle;
pub mod models;
pub mod notification;
pub mod repository;
pub mod simulation;
pub mod tui;

pub use controller::{ControllerState, TradeController};
pub use error::{MevShieldError, Result, TradeError};
