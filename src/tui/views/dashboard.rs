//! Dashboard layout and rendering.

use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Position, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, List, ListItem, Paragraph, Row, Sparkline, Table, TableState},
};

use crate::controller::ControllerState;
use crate::models::{Address, MarketStats, TradeData, TradeSide, USER_HISTORY_LIMIT, user_history};
use crate::tui::app::{App, Mode};
use crate::tui::components::status_bar;

/// Fixed price points drawn by the chart placeholder.
const CHART_POINTS: [u64; 7] = [2850, 2860, 2840, 2870, 2850, 2880, 2870];

/// Floor subtracted from the chart points so their variation is visible.
const CHART_BASELINE: u64 = 2830;

/// Renders the dashboard.
pub fn render(frame: &mut Frame, app: &App, state: &ControllerState) {
    let area = frame.area();
    let wallet = app.controller.wallet_address();
    let contract = app.controller.contract_address();

    let main_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // Status bar
            Constraint::Length(4), // Market stats
            Constraint::Min(10),   // Main content
            Constraint::Length(1), // Keybindings help
        ])
        .split(area);

    status_bar::render(frame, main_layout[0], state, wallet.as_ref(), &contract);
    render_stats(frame, main_layout[1], &state.stats);

    // Main content: chart and history | trade list
    let content = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(38), Constraint::Percentage(62)])
        .split(main_layout[2]);

    let left = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(content[0]);

    render_chart(frame, left[0], &state.stats);
    render_history(frame, left[1], state, wallet.as_ref());
    render_trades(frame, content[1], app, state);

    render_keybindings(frame, main_layout[3], app);
}

/// Renders the four market overview cards.
fn render_stats(frame: &mut Frame, area: Rect, stats: &MarketStats) {
    let cards = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Ratio(1, 4); 4])
        .split(area);

    let values = [
        ("Total Volume", stats.total_volume.to_string(), Color::Magenta),
        ("Active Trades", stats.active_trades.to_string(), Color::Blue),
        ("Avg Price", format!("${:.2}", stats.avg_price), Color::LightMagenta),
        ("24h Change", format!("{}%", stats.price_change), Color::Green),
    ];

    for ((label, value, color), card) in values.into_iter().zip(cards.iter()) {
        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(color));
        let lines = vec![
            Line::from(Span::styled(
                value,
                Style::default().fg(color).add_modifier(Modifier::BOLD),
            )),
            Line::from(Span::styled(label, Style::default().fg(Color::DarkGray))),
        ];
        frame.render_widget(Paragraph::new(lines).block(block), *card);
    }
}

/// Renders the price chart placeholder.
fn render_chart(frame: &mut Frame, area: Rect, stats: &MarketStats) {
    let block = Block::default()
        .title(format!(" ETH/USDT Chart  +{}% ", stats.price_change))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::DarkGray));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(1), Constraint::Length(1)])
        .split(inner);

    let points = CHART_POINTS.map(|p| p.saturating_sub(CHART_BASELINE));
    let sparkline = Sparkline::default()
        .data(&points)
        .style(Style::default().fg(Color::Cyan));
    frame.render_widget(sparkline, layout[0]);

    let labels = Line::from(vec![
        Span::styled("24H  ", Style::default().fg(Color::DarkGray)),
        Span::raw(format!("Current: ${:.2}", stats.avg_price)),
    ]);
    frame.render_widget(Paragraph::new(labels), layout[1]);
}

/// Renders the connected user's most recent trades.
fn render_history(frame: &mut Frame, area: Rect, state: &ControllerState, wallet: Option<&Address>) {
    let block = Block::default()
        .title(" Your Trade History ")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::DarkGray));

    let items: Vec<ListItem> = match wallet {
        Some(address) => user_history(&state.trades, address, USER_HISTORY_LIMIT)
            .into_iter()
            .map(|trade| {
                ListItem::new(Line::from(vec![
                    Span::styled(
                        format!("{:<5}", trade.side.as_str()),
                        Style::default().fg(side_color(trade.side)),
                    ),
                    Span::raw(format!("{:<10}", trade.pair)),
                    Span::raw(trade.amount.to_string()),
                ]))
            })
            .collect(),
        None => Vec::new(),
    };

    if items.is_empty() {
        let para = Paragraph::new(Span::styled(
            "No trades yet",
            Style::default().fg(Color::DarkGray),
        ))
        .block(block);
        frame.render_widget(para, area);
    } else {
        frame.render_widget(List::new(items).block(block), area);
    }
}

/// Renders the search controls and the filtered trade table.
fn render_trades(frame: &mut Frame, area: Rect, app: &App, state: &ControllerState) {
    let block = Block::default()
        .title(" FHE Protected Trades ")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(1), Constraint::Min(1)])
        .split(inner);

    render_controls(frame, layout[0], app);

    let filter = app.filter();
    let trades = filter.apply(&state.trades);
    if trades.is_empty() {
        let para = Paragraph::new(vec![
            Line::from(Span::styled(
                "No protected trades found",
                Style::default().fg(Color::DarkGray),
            )),
            Line::from(vec![
                Span::styled("[n]", Style::default().fg(Color::Yellow)),
                Span::raw(" Create First Trade"),
            ]),
        ]);
        frame.render_widget(para, layout[1]);
        return;
    }

    let header = Row::new(["Time", "Pair", "Type", "Amount", "Price", "Creator", "Status"])
        .style(Style::default().fg(Color::DarkGray).add_modifier(Modifier::BOLD));
    let rows = trades.iter().copied().map(trade_row);
    let widths = [
        Constraint::Length(9),
        Constraint::Length(9),
        Constraint::Length(5),
        Constraint::Length(8),
        Constraint::Length(8),
        Constraint::Length(12),
        Constraint::Min(12),
    ];
    let table = Table::new(rows, widths)
        .header(header)
        .row_highlight_style(Style::default().bg(Color::DarkGray).add_modifier(Modifier::BOLD));

    let mut table_state = TableState::default().with_selected(Some(app.selected.min(trades.len() - 1)));
    frame.render_stateful_widget(table, layout[1], &mut table_state);
}

fn trade_row(trade: &TradeData) -> Row<'static> {
    let time = trade
        .local_time()
        .map(|t| t.format("%H:%M:%S").to_string())
        .unwrap_or_else(|| "--".to_string());
    let status = if trade.is_verified {
        Span::styled("✅ Verified", Style::default().fg(Color::Green))
    } else {
        Span::styled("🔒 Encrypted", Style::default().fg(Color::Yellow))
    };

    Row::new(vec![
        Cell::from(time),
        Cell::from(trade.pair.clone()),
        Cell::from(Span::styled(
            trade.side.label(),
            Style::default().fg(side_color(trade.side)),
        )),
        Cell::from(trade.amount.to_string()),
        Cell::from(format!("${}", trade.price)),
        Cell::from(trade.creator.short()),
        Cell::from(status),
    ])
}

/// Renders the search box and side filter line.
fn render_controls(frame: &mut Frame, area: Rect, app: &App) {
    let editing = app.mode == Mode::Search;
    let search_style = if editing {
        Style::default().fg(Color::Cyan)
    } else {
        Style::default().fg(Color::White)
    };
    let search_text = if app.search.is_empty() && !editing {
        Span::styled("Search trades...", Style::default().fg(Color::DarkGray))
    } else {
        Span::styled(app.search.as_str().to_string(), search_style)
    };

    let prefix = "🔍 ";
    let line = Line::from(vec![
        Span::raw(prefix),
        search_text,
        Span::raw("   "),
        Span::styled(
            format!("[{}]", app.side_filter.label()),
            Style::default().fg(Color::Magenta),
        ),
    ]);
    frame.render_widget(Paragraph::new(line), area);

    if editing {
        let x = area.x + 3 + app.search.cursor_column();
        frame.set_cursor_position(Position::new(x.min(area.right().saturating_sub(1)), area.y));
    }
}

/// Renders keybinding hints.
fn render_keybindings(frame: &mut Frame, area: Rect, app: &App) {
    let hints = match app.mode {
        Mode::Search => " Enter/Esc:done  type to search",
        Mode::Normal => {
            " j/k:select  Enter:details  n:new trade  /:search  f:filter  r:refresh  t:test contract  x:dismiss  d:disconnect  q:quit"
        }
    };
    let para = Paragraph::new(Span::styled(hints, Style::default().fg(Color::DarkGray)));
    frame.render_widget(para, area);
}

fn side_color(side: TradeSide) -> Color {
    match side {
        TradeSide::Buy => Color::Green,
        TradeSide::Sell => Color::Red,
    }
}
