//! Widgets shared by several screens.

pub mod status_bar;
pub mod toast;
