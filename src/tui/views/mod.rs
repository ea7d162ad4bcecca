//! Full-screen views and the modals drawn over the dashboard.

pub mod connect;
pub mod create_modal;
pub mod dashboard;
pub mod detail_modal;

use ratatui::layout::{Constraint, Direction, Layout, Rect};

/// Returns a rectangle of the given size centered in `area`, clipped to it.
pub(crate) fn centered_rect(width: u16, height: u16, area: Rect) -> Rect {
    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Fill(1),
            Constraint::Length(height.min(area.height)),
            Constraint::Fill(1),
        ])
        .split(area);
    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Fill(1),
            Constraint::Length(width.min(area.width)),
            Constraint::Fill(1),
        ])
        .split(vertical[1])[1]
}
