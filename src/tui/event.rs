//! Event handling for the TUI.

use std::time::{Duration, Instant};

use crossterm::event::{self, Event as CrosstermEvent, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use tokio::sync::mpsc;

use crate::lifecycle::{ComputeStatus, CreateState, DecryptState, LoadState};
use crate::models::{Address, TradeForm};

use super::app::{App, FormField, Mode, Overlay, Screen};

/// Events that can occur in the application.
#[derive(Debug)]
pub enum Event {
    /// A key was pressed.
    Key(KeyEvent),
    /// Terminal was resized.
    Resize(u16, u16),
    /// Periodic tick for UI updates.
    Tick,
}

/// Messages that update application state.
#[derive(Debug)]
pub enum Message {
    /// Input event from terminal.
    Input(Event),

    /// Wallet connection finished, with the account on success.
    WalletConnected(Option<Address>),
    /// Confidential-compute initialization finished.
    ComputeInitialized(ComputeStatus),
    /// A refresh finished.
    TradesLoaded(LoadState),
    /// A trade-creation flow finished.
    TradeCreated(CreateState),
    /// A decryption flow finished.
    TradeDecrypted(DecryptState),
    /// The contract health check finished.
    AvailabilityChecked(Option<bool>),

    /// Request to quit the application.
    Quit,
}

/// Actions that run a controller flow outside the render loop.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    ConnectWallet,
    InitializeCompute,
    Refresh,
    CreateTrade(TradeForm),
    /// Verify the decryption of the trade with this id.
    DecryptTrade(String),
    CheckAvailability,
}

/// Spawns a task that polls for terminal events and sends them to a channel.
pub fn spawn_event_reader(tx: mpsc::UnboundedSender<Message>) {
    tokio::spawn(async move {
        loop {
            // Poll for events with a 50ms timeout
            match tokio::task::spawn_blocking(|| {
                if event::poll(Duration::from_millis(50)).unwrap_or(false) {
                    event::read().ok()
                } else {
                    None
                }
            })
            .await
            {
                Ok(Some(CrosstermEvent::Key(key))) if key.kind == KeyEventKind::Press => {
                    if tx.send(Message::Input(Event::Key(key))).is_err() {
                        break;
                    }
                }
                Ok(Some(CrosstermEvent::Resize(w, h))) => {
                    if tx.send(Message::Input(Event::Resize(w, h))).is_err() {
                        break;
                    }
                }
                Ok(_) => {}
                Err(_) => break,
            }
        }
    });
}

/// Spawns a task that sends periodic tick events.
pub fn spawn_tick_timer(tx: mpsc::UnboundedSender<Message>, interval: Duration) {
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(interval);
        loop {
            interval.tick().await;
            if tx.send(Message::Input(Event::Tick)).is_err() {
                break;
            }
        }
    });
}

/// Updates application state based on a message.
pub fn update(app: &mut App, message: Message) -> Option<Action> {
    match message {
        Message::Input(event) => handle_input(app, event),
        Message::WalletConnected(_) | Message::ComputeInitialized(_) => None,
        Message::TradesLoaded(_) => {
            app.clamp_selection();
            // A reload can drop the trade whose details are open.
            let stale = match &app.overlay {
                Overlay::TradeDetail(id) => app.controller.state().trade(id).is_none(),
                _ => false,
            };
            if stale {
                app.close_overlay();
            }
            None
        }
        Message::TradeCreated(state) => {
            if matches!(state, CreateState::Succeeded { .. }) {
                app.form.reset();
                if app.overlay == Overlay::CreateTrade {
                    app.close_overlay();
                }
            }
            app.clamp_selection();
            None
        }
        Message::TradeDecrypted(_) | Message::AvailabilityChecked(_) => None,
        Message::Quit => {
            app.should_quit = true;
            None
        }
    }
}

/// Handles input events and updates application state.
fn handle_input(app: &mut App, event: Event) -> Option<Action> {
    match event {
        Event::Key(key) => handle_key(app, key),
        Event::Resize(_, _) => None,
        Event::Tick => {
            app.controller.tick(Instant::now());
            None
        }
    }
}

/// Handles key press events.
fn handle_key(app: &mut App, key: KeyEvent) -> Option<Action> {
    if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
        app.should_quit = true;
        return None;
    }

    match app.screen() {
        Screen::Connect => handle_connect_keys(app, key),
        Screen::Initializing => handle_initializing_keys(app, key),
        Screen::Dashboard => match app.overlay.clone() {
            Overlay::CreateTrade => handle_create_keys(app, key),
            Overlay::TradeDetail(id) => handle_detail_keys(app, key, id),
            Overlay::None => match app.mode {
                Mode::Normal => handle_dashboard_keys(app, key),
                Mode::Search => handle_search_keys(app, key),
            },
        },
    }
}

/// Handles keys on the connection prompt.
fn handle_connect_keys(app: &mut App, key: KeyEvent) -> Option<Action> {
    match key.code {
        KeyCode::Char('q') | KeyCode::Esc => {
            app.should_quit = true;
            None
        }
        KeyCode::Enter | KeyCode::Char('c') => Some(Action::ConnectWallet),
        _ => None,
    }
}

/// Handles keys while the compute client is initializing or has failed.
fn handle_initializing_keys(app: &mut App, key: KeyEvent) -> Option<Action> {
    match key.code {
        KeyCode::Char('q') => {
            app.should_quit = true;
            None
        }
        KeyCode::Char('r') => Some(Action::InitializeCompute),
        KeyCode::Char('d') => {
            app.controller.disconnect_wallet();
            None
        }
        _ => None,
    }
}

/// Handles keys on the dashboard with no modal open.
fn handle_dashboard_keys(app: &mut App, key: KeyEvent) -> Option<Action> {
    match key.code {
        KeyCode::Char('q') => {
            app.should_quit = true;
            None
        }
        KeyCode::Char('j') | KeyCode::Down => {
            app.select_next();
            None
        }
        KeyCode::Char('k') | KeyCode::Up => {
            app.select_previous();
            None
        }
        KeyCode::Enter => {
            app.open_selected_detail();
            None
        }
        KeyCode::Char('n') => {
            app.open_create();
            None
        }
        KeyCode::Char('/') => {
            app.mode = Mode::Search;
            None
        }
        KeyCode::Char('f') => {
            app.side_filter.cycle();
            app.clamp_selection();
            None
        }
        KeyCode::Char('r') => Some(Action::Refresh),
        KeyCode::Char('t') => Some(Action::CheckAvailability),
        KeyCode::Char('x') => {
            app.controller.dismiss_notification();
            None
        }
        KeyCode::Char('d') => {
            app.controller.disconnect_wallet();
            app.close_overlay();
            None
        }
        KeyCode::Esc => {
            app.search.clear();
            app.side_filter = Default::default();
            app.clamp_selection();
            None
        }
        _ => None,
    }
}

/// Handles keys while editing the search box.
fn handle_search_keys(app: &mut App, key: KeyEvent) -> Option<Action> {
    match key.code {
        KeyCode::Enter | KeyCode::Esc => app.mode = Mode::Normal,
        KeyCode::Char(c) => {
            app.search.insert(c);
        }
        KeyCode::Backspace => app.search.backspace(),
        KeyCode::Delete => app.search.delete(),
        KeyCode::Left => app.search.move_left(),
        KeyCode::Right => app.search.move_right(),
        KeyCode::Home => app.search.move_home(),
        KeyCode::End => app.search.move_end(),
        _ => {}
    }
    app.selected = 0;
    app.clamp_selection();
    None
}

/// Handles keys in the create-trade modal.
fn handle_create_keys(app: &mut App, key: KeyEvent) -> Option<Action> {
    let form = &mut app.form;
    match key.code {
        KeyCode::Esc => {
            app.close_overlay();
            None
        }
        KeyCode::Enter => {
            if app.controller.state().create.is_in_flight() {
                return None;
            }
            Some(Action::CreateTrade(form.to_form()))
        }
        KeyCode::Tab | KeyCode::Down => {
            form.field = form.field.next();
            None
        }
        KeyCode::BackTab | KeyCode::Up => {
            form.field = form.field.previous();
            None
        }
        KeyCode::Left | KeyCode::Right | KeyCode::Char(' ')
            if matches!(form.field, FormField::Pair | FormField::Side) =>
        {
            match form.field {
                FormField::Pair => form.pair = form.pair.next(),
                _ => form.side.toggle(),
            }
            None
        }
        code => {
            if let Some(input) = form.focused_input() {
                match code {
                    KeyCode::Char(c) => {
                        input.insert(c);
                    }
                    KeyCode::Backspace => input.backspace(),
                    KeyCode::Delete => input.delete(),
                    KeyCode::Left => input.move_left(),
                    KeyCode::Right => input.move_right(),
                    KeyCode::Home => input.move_home(),
                    KeyCode::End => input.move_end(),
                    _ => {}
                }
            }
            None
        }
    }
}

/// Handles keys in the trade-detail modal.
fn handle_detail_keys(app: &mut App, key: KeyEvent, trade_id: String) -> Option<Action> {
    match key.code {
        KeyCode::Esc | KeyCode::Char('q') => {
            app.close_overlay();
            None
        }
        KeyCode::Char('v') | KeyCode::Enter => {
            let state = app.controller.state();
            if state.decrypt.is_in_flight() {
                return None;
            }
            Some(Action::DecryptTrade(trade_id))
        }
        _ => None,
    }
}
