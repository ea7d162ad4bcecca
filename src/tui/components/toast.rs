//! The transaction toast, drawn over whatever screen is active.

use ratatui::{
    Frame,
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
};
use unicode_width::UnicodeWidthStr;

use crate::notification::{Notification, NotificationKind};

const MAX_WIDTH: u16 = 48;

/// Renders the notification in the top-right corner of `area`.
pub fn render(frame: &mut Frame, area: Rect, notification: &Notification) {
    if area.width < 8 || area.height < 4 {
        return;
    }

    let color = match notification.kind {
        NotificationKind::Pending => Color::Yellow,
        NotificationKind::Success => Color::Green,
        NotificationKind::Error => Color::Red,
    };

    let text = format!("{} {}", notification.kind.icon(), notification.message);
    let content_width = u16::try_from(text.width()).unwrap_or(MAX_WIDTH);
    let width = (content_width + 4).min(MAX_WIDTH).min(area.width);
    let inner_width = width.saturating_sub(2).max(1);
    let lines = content_width.div_ceil(inner_width).max(1);
    let height = (lines + 2).min(area.height - 1);

    let rect = Rect {
        x: area.x + area.width.saturating_sub(width + 1),
        y: area.y + 1,
        width,
        height,
    };

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(color));
    let para = Paragraph::new(Line::from(Span::styled(
        text,
        Style::default().fg(color).add_modifier(Modifier::BOLD),
    )))
    .wrap(Wrap { trim: true })
    .block(block);

    frame.render_widget(Clear, rect);
    frame.render_widget(para, rect);
}
