//! Terminal user interface for MEV Shield.
//!
//! Provides a Ratatui-based TUI for connecting a wallet, browsing the
//! protected trades, submitting new encrypted trades, and verifying
//! their decryption.

pub mod app;
pub mod components;
pub mod event;
pub mod input;
pub mod terminal;
pub mod ui;
pub mod views;

pub use app::App;
pub use event::{Action, Event, Message};
pub use terminal::{Tui, restore_terminal, setup_terminal};
pub use ui::render;
