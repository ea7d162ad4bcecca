use std::fs::OpenOptions;
use std::path::Path;
use std::sync::Mutex;
use std::time::Duration;

use tokio::sync::mpsc;
use tracing::info;
use tracing_subscriber::EnvFilter;

use mevshield::client::ClientError;
use mevshield::config::fetch_config;
use mevshield::lifecycle::LoadState;
use mevshield::repository::TradeSnapshot;
use mevshield::simulation::SimulatedNetwork;
use mevshield::tui::event::{spawn_event_reader, spawn_tick_timer, update};
use mevshield::tui::{Action, App, Message, Tui, render, restore_terminal, setup_terminal};
use mevshield::{MevShieldError, Result, TradeController};

#[tokio::main]
async fn main() -> Result<()> {
    let config = fetch_config()?;
    init_logging(&config.log_file)?;

    let network = SimulatedNetwork::new(
        config.contract_address.clone(),
        config.wallet_address.clone(),
        config.simulation.clone(),
    );
    let controller = TradeController::new(network.clients());
    info!(contract = %config.contract_address, "starting mevshield");

    match std::env::args().nth(1).as_deref() {
        None | Some("tui") => run_tui(controller, config.tick_rate).await,
        Some("snapshot") => snapshot(&controller).await,
        Some(other) => Err(MevShieldError::Config(format!(
            "unknown command {other:?}; expected `tui` or `snapshot`"
        ))),
    }
}

/// Sends `tracing` output to a file; the terminal belongs to the TUI.
fn init_logging(path: &Path) -> Result<()> {
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .map_err(|e| MevShieldError::Io(format!("failed to open log file {}: {e}", path.display())))?;

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| "info,mevshield=debug".into()),
        )
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .init();
    Ok(())
}

/// Connects, loads every trade, and prints the trades and market stats as JSON.
async fn snapshot(controller: &TradeController) -> Result<()> {
    if controller.connect_wallet().await.is_none() {
        return Err(ClientError::new("wallet connection failed").into());
    }

    let snapshot = {
        let state = controller.state();
        if let LoadState::Failed(reason) = &state.load {
            return Err(ClientError::new(reason.clone()).into());
        }
        TradeSnapshot {
            trades: state.trades.clone(),
            stats: state.stats.clone(),
        }
    };

    println!("{}", serde_json::to_string_pretty(&snapshot)?);
    Ok(())
}

async fn run_tui(controller: TradeController, tick_rate: Duration) -> Result<()> {
    let mut terminal = setup_terminal()?;
    let result = event_loop(&mut terminal, controller, tick_rate).await;
    restore_terminal(&mut terminal)?;
    result
}

async fn event_loop(
    terminal: &mut Tui,
    controller: TradeController,
    tick_rate: Duration,
) -> Result<()> {
    let (tx, mut rx) = mpsc::unbounded_channel();
    spawn_event_reader(tx.clone());
    spawn_tick_timer(tx.clone(), tick_rate);

    let mut app = App::new(controller);
    while !app.should_quit {
        terminal
            .draw(|frame| render(frame, &app))
            .map_err(|e| MevShieldError::Io(format!("failed to draw: {e}")))?;

        let Some(message) = rx.recv().await else {
            break;
        };
        if let Some(action) = update(&mut app, message) {
            dispatch(app.controller.clone(), action, tx.clone());
        }
    }
    info!("exiting");
    Ok(())
}

/// Runs a controller flow on its own task and reports the outcome as a message.
fn dispatch(controller: TradeController, action: Action, tx: mpsc::UnboundedSender<Message>) {
    tokio::spawn(async move {
        let message = match action {
            Action::ConnectWallet => Message::WalletConnected(controller.connect_wallet().await),
            Action::InitializeCompute => {
                Message::ComputeInitialized(controller.ensure_compute_ready().await)
            }
            Action::Refresh => Message::TradesLoaded(controller.refresh().await),
            Action::CreateTrade(form) => Message::TradeCreated(controller.create_trade(form).await),
            Action::DecryptTrade(id) => {
                Message::TradeDecrypted(controller.decrypt_trade(&id).await)
            }
            Action::CheckAvailability => {
                Message::AvailabilityChecked(controller.check_availability().await)
            }
        };
        let _ = tx.send(message);
    });
}
