//! The create-trade modal.

use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Position, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Clear, Paragraph},
};

use crate::lifecycle::CreateState;
use crate::tui::app::{FormField, FormState};
use crate::tui::input::TextInput;

use super::centered_rect;

/// Renders the modal over the dashboard.
pub fn render(frame: &mut Frame, form: &FormState, create: &CreateState) {
    let area = centered_rect(58, 17, frame.area());
    frame.render_widget(Clear, area);

    let block = Block::default()
        .title(" Create FHE Protected Trade ")
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(Color::Cyan));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(2), // Notice
            Constraint::Length(2), // Pair
            Constraint::Length(2), // Side
            Constraint::Length(3), // Amount
            Constraint::Length(3), // Price
            Constraint::Length(1), // Submit
            Constraint::Min(0),
        ])
        .split(inner);

    let notice = vec![
        Line::from(Span::styled(
            "🔐 FHE Encryption Active",
            Style::default().add_modifier(Modifier::BOLD),
        )),
        Line::from(Span::styled(
            "Trade amounts are encrypted to prevent MEV attacks",
            Style::default().fg(Color::DarkGray),
        )),
    ];
    frame.render_widget(Paragraph::new(notice), rows[0]);

    render_choice(frame, rows[1], "Trading Pair", form.pair.as_str(), form.field == FormField::Pair);
    render_choice(frame, rows[2], "Order Type", form.side.label(), form.field == FormField::Side);
    render_input(
        frame,
        rows[3],
        "Amount (FHE Encrypted)",
        "Encrypted with FHE 🔒",
        &form.amount,
        form.field == FormField::Amount,
    );
    render_input(
        frame,
        rows[4],
        "Price (Public)",
        "Public market data",
        &form.price,
        form.field == FormField::Price,
    );

    let ready = form.to_form().is_complete() && !create.is_in_flight();
    let submit_label = if create.is_in_flight() {
        create.label()
    } else {
        CreateState::Idle.label()
    };
    let submit_style = if ready {
        Style::default().fg(Color::Black).bg(Color::Green)
    } else {
        Style::default().fg(Color::DarkGray)
    };
    let footer = Line::from(vec![
        Span::styled(format!(" [Enter] {submit_label} "), submit_style),
        Span::raw("  "),
        Span::styled("[Esc] Cancel", Style::default().fg(Color::Yellow)),
    ]);
    frame.render_widget(Paragraph::new(footer), rows[5]);
}

fn label_style(focused: bool) -> Style {
    if focused {
        Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(Color::Gray)
    }
}

/// Renders a field that cycles through fixed values.
fn render_choice(frame: &mut Frame, area: Rect, label: &str, value: &str, focused: bool) {
    let line = Line::from(vec![
        Span::styled(format!("{label:<24}"), label_style(focused)),
        Span::raw("◀ "),
        Span::styled(value.to_string(), Style::default().add_modifier(Modifier::BOLD)),
        Span::raw(" ▶"),
    ]);
    frame.render_widget(Paragraph::new(line), area);
}

/// Renders a text field with its hint below.
fn render_input(
    frame: &mut Frame,
    area: Rect,
    label: &str,
    hint: &str,
    input: &TextInput,
    focused: bool,
) {
    let value = if input.is_empty() {
        Span::styled("Enter value", Style::default().fg(Color::DarkGray))
    } else {
        Span::raw(input.as_str().to_string())
    };
    let lines = vec![
        Line::from(vec![Span::styled(format!("{label:<24}"), label_style(focused)), value]),
        Line::from(Span::styled(
            format!("{:24}{hint}", ""),
            Style::default().fg(Color::DarkGray),
        )),
    ];
    frame.render_widget(Paragraph::new(lines), area);

    if focused {
        let x = area.x + 24 + input.cursor_column();
        frame.set_cursor_position(Position::new(x.min(area.right().saturating_sub(1)), area.y));
    }
}
