//! Screens shown before the dashboard: the wallet prompt and the
//! confidential-compute initialization screen.

use ratatui::{
    Frame,
    layout::Alignment,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Paragraph},
};

use crate::lifecycle::ComputeStatus;

use super::centered_rect;

/// Renders the wallet connection prompt.
pub fn render_connect(frame: &mut Frame) {
    let area = centered_rect(60, 14, frame.area());

    let lines = vec![
        Line::from(Span::styled(
            "MEV Shield DEX 🔐",
            Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
        )),
        Line::from(Span::styled(
            "Anti-Front-Running Exchange",
            Style::default().fg(Color::DarkGray),
        )),
        Line::default(),
        Line::from(Span::styled(
            "Connect Wallet to Start Trading",
            Style::default().add_modifier(Modifier::BOLD),
        )),
        Line::from("Experience MEV-protected trading with FHE encryption"),
        Line::default(),
        Line::from("🔒 Encrypted Trade Intents"),
        Line::from("🛡️ Front-Running Protection"),
        Line::from("⚡ Fair Execution"),
        Line::default(),
        Line::from(vec![
            Span::styled("[Enter]", Style::default().fg(Color::Yellow)),
            Span::raw(" Connect wallet   "),
            Span::styled("[q]", Style::default().fg(Color::Yellow)),
            Span::raw(" Quit"),
        ]),
    ];

    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(Color::Cyan));
    frame.render_widget(
        Paragraph::new(lines).alignment(Alignment::Center).block(block),
        area,
    );
}

/// Renders the initialization screen, or the failure with a retry hint.
pub fn render_initializing(frame: &mut Frame, status: &ComputeStatus) {
    let area = centered_rect(60, 9, frame.area());

    let mut lines = match status {
        ComputeStatus::Failed(reason) => vec![
            Line::from(Span::styled(
                "FHEVM initialization failed",
                Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
            )),
            Line::from(Span::styled(reason.as_str(), Style::default().fg(Color::DarkGray))),
        ],
        _ => vec![
            Line::from(Span::styled(
                "Initializing FHE Trading System...",
                Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
            )),
            Line::from(Span::styled(
                "Securing your trade intents",
                Style::default().fg(Color::DarkGray),
            )),
        ],
    };
    lines.push(Line::default());
    lines.push(Line::from(vec![
        Span::styled("[r]", Style::default().fg(Color::Yellow)),
        Span::raw(" Retry   "),
        Span::styled("[d]", Style::default().fg(Color::Yellow)),
        Span::raw(" Disconnect   "),
        Span::styled("[q]", Style::default().fg(Color::Yellow)),
        Span::raw(" Quit"),
    ]));

    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded);
    frame.render_widget(
        Paragraph::new(lines).alignment(Alignment::Center).block(block),
        area,
    );
}
