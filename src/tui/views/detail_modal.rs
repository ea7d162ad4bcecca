//! The trade-detail modal with the decryption action.

use ratatui::{
    Frame,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Clear, Paragraph, Wrap},
};

use crate::lifecycle::DecryptState;
use crate::models::{TradeData, TradeSide};

use super::centered_rect;

/// Renders the modal over the dashboard.
pub fn render(frame: &mut Frame, trade: &TradeData, decrypt: &DecryptState) {
    let area = centered_rect(60, 19, frame.area());
    frame.render_widget(Clear, area);

    let side_color = match trade.side {
        TradeSide::Buy => Color::Green,
        TradeSide::Sell => Color::Red,
    };
    let time = trade
        .local_time()
        .map(|t| t.format("%Y-%m-%d %H:%M:%S").to_string())
        .unwrap_or_else(|| "--".to_string());

    let mut lines = vec![
        info_row("Pair", Span::raw(trade.pair.clone())),
        info_row(
            "Type",
            Span::styled(trade.side.label(), Style::default().fg(side_color)),
        ),
        info_row("Amount", Span::raw(trade.amount.to_string())),
        info_row("Price", Span::raw(format!("${}", trade.price))),
        info_row("Time", Span::raw(time)),
        info_row("Creator", Span::raw(trade.creator.to_string())),
        Line::default(),
        Line::from(Span::styled(
            "FHE Protection Status",
            Style::default().add_modifier(Modifier::BOLD),
        )),
    ];

    let this_trade = decrypt.trade_id() == Some(trade.id.as_str());
    match revealed_amount(trade, decrypt) {
        Some(value) => {
            lines.push(Line::from(Span::styled(
                "✅ On-chain Verified",
                Style::default().fg(Color::Green),
            )));
            lines.push(info_row("Decrypted Amount", Span::raw(value.to_string())));
        }
        None => {
            lines.push(Line::from(Span::styled(
                "🔒 FHE Encrypted",
                Style::default().fg(Color::Yellow),
            )));
            let action = if this_trade && decrypt.is_in_flight() {
                Span::styled("Decrypting...", Style::default().fg(Color::Yellow))
            } else {
                Span::styled(
                    "[v] Verify Decryption",
                    Style::default().fg(Color::Black).bg(Color::Cyan),
                )
            };
            lines.push(Line::from(action));
        }
    }

    if this_trade && let DecryptState::Failed { error, .. } = decrypt {
        lines.push(Line::from(Span::styled(
            error.to_string(),
            Style::default().fg(Color::Red),
        )));
    }

    lines.push(Line::default());
    lines.push(Line::from(Span::styled(
        "🛡️ MEV Protection Active",
        Style::default().add_modifier(Modifier::BOLD),
    )));
    lines.push(Line::from(Span::styled(
        "The amount stayed encrypted in the mempool, so it could not be front-run.",
        Style::default().fg(Color::DarkGray),
    )));
    lines.push(Line::from(Span::styled(
        "[Esc] Close",
        Style::default().fg(Color::Yellow),
    )));

    let block = Block::default()
        .title(" Trade Details ")
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(Color::Cyan));
    frame.render_widget(
        Paragraph::new(lines).wrap(Wrap { trim: true }).block(block),
        area,
    );
}

/// The cleartext to show: the loaded projection, or the value the last
/// decryption of this trade surfaced before a reload caught up.
fn revealed_amount(trade: &TradeData, decrypt: &DecryptState) -> Option<u64> {
    trade.decrypted_amount().or_else(|| {
        if decrypt.trade_id() == Some(trade.id.as_str()) {
            decrypt.revealed_value()
        } else {
            None
        }
    })
}

fn info_row(label: &str, value: Span<'static>) -> Line<'static> {
    Line::from(vec![
        Span::styled(format!("{label:<18}"), Style::default().fg(Color::Gray)),
        value.patch_style(Style::default().add_modifier(Modifier::BOLD)),
    ])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Address, BusinessData};

    fn encrypted_trade(id: &str) -> TradeData {
        TradeData::from_record(
            id,
            BusinessData {
                name: "ETH/USDT".to_string(),
                public_value1: 9,
                public_value2: 2850,
                timestamp: 0,
                creator: Address::new("0x00000000000000000000000000000000000000aa"),
                decrypted_value: 0,
                is_verified: false,
            },
        )
    }

    #[test]
    fn shows_value_surfaced_by_decryption_of_same_trade() {
        let trade = encrypted_trade("trade-1");
        let decrypt = DecryptState::AlreadyVerified {
            trade_id: "trade-1".to_string(),
            value: Some(9),
        };
        assert_eq!(revealed_amount(&trade, &decrypt), Some(9));
    }

    #[test]
    fn ignores_value_of_another_trade() {
        let trade = encrypted_trade("trade-1");
        let decrypt = DecryptState::Verified {
            trade_id: "trade-2".to_string(),
            value: 4,
        };
        assert_eq!(revealed_amount(&trade, &decrypt), None);
        assert_eq!(revealed_amount(&trade, &DecryptState::Idle), None);
    }
}
