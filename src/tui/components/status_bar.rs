//! Status bar component.

use ratatui::{
    Frame,
    layout::Rect,
    style::{Color, Style},
    text::{Line, Span},
    widgets::Paragraph,
};

use crate::controller::ControllerState;
use crate::lifecycle::{ComputeStatus, LoadState};
use crate::models::Address;

/// Renders the status bar.
pub fn render(
    frame: &mut Frame,
    area: Rect,
    state: &ControllerState,
    wallet: Option<&Address>,
    contract: &Address,
) {
    let (compute_label, compute_color) = match &state.compute {
        ComputeStatus::Ready => (" FHE Ready ", Color::Green),
        ComputeStatus::Initializing => (" FHE Initializing... ", Color::Yellow),
        ComputeStatus::Uninitialized => (" FHE Off ", Color::DarkGray),
        ComputeStatus::Failed(_) => (" FHE Failed ", Color::Red),
    };

    let (load_label, load_color) = match &state.load {
        LoadState::NotLoaded => (" Not loaded ".to_string(), Color::DarkGray),
        LoadState::Loading => (" Refreshing... ".to_string(), Color::Yellow),
        LoadState::Loaded => (format!(" {} trades ", state.trades.len()), Color::White),
        LoadState::Failed(_) => (" Load failed ".to_string(), Color::Red),
    };

    let wallet_span = match wallet {
        Some(address) => Span::styled(
            format!(" {} ", address.short()),
            Style::default().fg(Color::Cyan),
        ),
        None => Span::styled(" Not connected ", Style::default().fg(Color::Red)),
    };

    let line = Line::from(vec![
        Span::styled(
            " MEV Shield DEX ",
            Style::default().fg(Color::Black).bg(Color::Cyan),
        ),
        Span::raw("│"),
        wallet_span,
        Span::raw("│"),
        Span::styled(compute_label, Style::default().fg(compute_color)),
        Span::raw("│"),
        Span::styled(load_label, Style::default().fg(load_color)),
        Span::raw("│"),
        Span::styled(
            format!(" contract {} ", contract.short()),
            Style::default().fg(Color::Gray),
        ),
    ]);

    let para = Paragraph::new(line).style(Style::default().bg(Color::DarkGray));
    frame.render_widget(para, area);
}
