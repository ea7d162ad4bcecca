//! Trade lifecycle controller.
//!
//! [`TradeController`] owns the flow states, the loaded trades, and the
//! notification slot, and drives every remote call. Its state lives behind a
//! mutex that is only held between suspension points, never across one, so a
//! flow can run on its own task while the UI keeps rendering a consistent
//! view of that state.
//!
//! Flows never return errors: every failure is classified into a
//! [`TradeError`], stored in the flow's terminal state, and surfaced as a
//! single error notification. Nothing is retried.

use std::sync::Arc;
use std::time::Instant;

use chrono::Utc;
use parking_lot::{Mutex, MutexGuard};
use tracing::{debug, error, info, warn};

use crate::client::{Clients, CreateBusinessRequest, RecordVerifier, TxReceipt};
use crate::error::{TradeError, is_already_verified};
use crate::lifecycle::{ComputeStatus, CreateState, DecryptState, LoadState};
use crate::models::{Address, MarketStats, TradeData, TradeForm, new_trade_id};
use crate::notification::{NotificationKind, NotificationSlot};
use crate::repository::{TradeRepository, TradeSnapshot};

/// Everything the UI renders, as owned by the controller.
#[derive(Debug, Default)]
pub struct ControllerState {
    pub compute: ComputeStatus,
    pub load: LoadState,
    /// Latest full trade collection; replaced wholesale on every reload.
    pub trades: Vec<TradeData>,
    pub stats: MarketStats,
    pub create: CreateState,
    pub decrypt: DecryptState,
    pub notification: NotificationSlot,
    /// Bumped by every load; only the latest load may apply its result.
    load_generation: u64,
}

impl ControllerState {
    /// Looks up a loaded trade by id.
    pub fn trade(&self, id: &str) -> Option<&TradeData> {
        self.trades.iter().find(|t| t.id == id)
    }

    fn notify(&mut self, kind: NotificationKind, message: impl Into<String>) {
        let message = message.into();
        debug!(?kind, %message, "notification");
        self.notification.show(kind, message, Instant::now());
    }

    /// Replaces the collection, keeping verification monotonic.
    fn apply_snapshot(&mut self, snapshot: TradeSnapshot) {
        let TradeSnapshot { mut trades, stats } = snapshot;

        for trade in trades.iter_mut().filter(|t| !t.is_verified) {
            if let Some(previous) = self.trade(&trade.id).filter(|p| p.is_verified) {
                warn!(
                    trade_id = %trade.id,
                    "contract reported a verified trade as unverified; keeping verified value"
                );
                trade.is_verified = true;
                trade.encrypted_amount = previous.encrypted_amount;
            }
        }

        self.trades = trades;
        self.stats = stats;
        self.load = LoadState::Loaded;
    }

    /// Records a verification read straight from the contract.
    fn mark_verified(&mut self, trade_id: &str, value: u64) {
        if let Some(trade) = self.trades.iter_mut().find(|t| t.id == trade_id) {
            trade.is_verified = true;
            trade.encrypted_amount = value;
        }
    }

    fn fail_create(&mut self, error: TradeError) -> CreateState {
        warn!(%error, "trade creation failed");
        self.notify(NotificationKind::Error, error.to_string());
        self.create = CreateState::Failed(error);
        self.create.clone()
    }

    fn fail_decrypt(&mut self, trade_id: &str, error: TradeError) -> DecryptState {
        warn!(%trade_id, %error, "trade decryption failed");
        self.notify(NotificationKind::Error, error.to_string());
        self.decrypt = DecryptState::Failed {
            trade_id: trade_id.to_string(),
            error,
        };
        self.decrypt.clone()
    }
}

/// Drives the trade flows against the external collaborators.
///
/// Cloning is cheap and every clone shares the same state.
#[derive(Clone)]
pub struct TradeController {
    clients: Clients,
    repository: TradeRepository,
    state: Arc<Mutex<ControllerState>>,
}

impl TradeController {
    pub fn new(clients: Clients) -> Self {
        let repository = TradeRepository::new(clients.reader.clone());
        Self {
            clients,
            repository,
            state: Arc::new(Mutex::new(ControllerState::default())),
        }
    }

    /// Locks the state for reading or rendering.
    ///
    /// Do not hold the guard across an `.await`.
    pub fn state(&self) -> MutexGuard<'_, ControllerState> {
        self.state.lock()
    }

    /// The connected wallet account, if any.
    pub fn wallet_address(&self) -> Option<Address> {
        self.clients.wallet.address()
    }

    pub fn is_connected(&self) -> bool {
        self.clients.wallet.is_connected()
    }

    /// Deployed contract address.
    pub fn contract_address(&self) -> Address {
        self.clients.reader.address().clone()
    }

    /// Hides the notification once its dismiss delay has elapsed.
    pub fn tick(&self, now: Instant) {
        self.state.lock().notification.expire(now);
    }

    pub fn dismiss_notification(&self) {
        self.state.lock().notification.dismiss();
    }

    /// Connects the wallet, then initializes the compute client and loads the trades.
    ///
    /// Returns the connected account, or `None` if the wallet refused.
    pub async fn connect_wallet(&self) -> Option<Address> {
        let address = match self.clients.wallet.connect().await {
            Ok(address) => address,
            Err(e) => {
                warn!(error = %e, "wallet connection failed");
                self.state
                    .lock()
                    .notify(NotificationKind::Error, format!("Wallet connection failed: {e}"));
                return None;
            }
        };
        info!(%address, "wallet connected");

        {
            let mut state = self.state.lock();
            state.create = CreateState::Idle;
            state.decrypt = DecryptState::Idle;
        }

        self.ensure_compute_ready().await;
        self.refresh().await;
        Some(address)
    }

    /// Disconnects the wallet and resets both flows.
    pub fn disconnect_wallet(&self) {
        self.clients.wallet.disconnect();
        let mut state = self.state.lock();
        state.create = CreateState::Idle;
        state.decrypt = DecryptState::Idle;
        info!("wallet disconnected");
    }

    /// Initializes the confidential-compute client unless it is ready or
    /// already initializing.
    pub async fn ensure_compute_ready(&self) -> ComputeStatus {
        {
            let mut state = self.state.lock();
            if !self.clients.wallet.is_connected() {
                return state.compute.clone();
            }
            if self.clients.compute.is_initialized() {
                state.compute = ComputeStatus::Ready;
                return ComputeStatus::Ready;
            }
            if state.compute == ComputeStatus::Initializing {
                debug!("compute initialization already running");
                return ComputeStatus::Initializing;
            }
            state.compute = ComputeStatus::Initializing;
        }

        let result = self.clients.compute.initialize().await;

        let mut state = self.state.lock();
        let status = match result {
            Ok(()) => {
                info!("confidential compute client ready");
                ComputeStatus::Ready
            }
            Err(e) => {
                error!(error = %e, "confidential compute initialization failed");
                let failure = TradeError::ComputeUnavailable(e.message().to_string());
                state.notify(NotificationKind::Error, failure.to_string());
                ComputeStatus::Failed(e.message().to_string())
            }
        };
        state.compute = status.clone();
        status
    }

    /// Reloads the trade collection unless disconnected or a reload is running.
    pub async fn refresh(&self) -> LoadState {
        {
            let mut state = self.state.lock();
            if !self.clients.wallet.is_connected() || state.load.is_loading() {
                return state.load.clone();
            }
            state.load = LoadState::Loading;
        }
        self.load_into_state().await
    }

    /// Reloads unconditionally; used at the end of a flow so the new
    /// on-chain state is always picked up.
    async fn reload(&self) -> LoadState {
        self.state.lock().load = LoadState::Loading;
        self.load_into_state().await
    }

    async fn load_into_state(&self) -> LoadState {
        let generation = {
            let mut state = self.state.lock();
            state.load_generation += 1;
            state.load_generation
        };

        let result = self.repository.load_trades().await;

        let mut state = self.state.lock();
        if state.load_generation != generation {
            debug!(generation, latest = state.load_generation, "dropping superseded load");
            return state.load.clone();
        }
        match result {
            Ok(snapshot) => state.apply_snapshot(snapshot),
            Err(e) => {
                state.notify(NotificationKind::Error, e.to_string());
                state.load = LoadState::Failed(match e {
                    TradeError::LoadFailure(reason) => reason,
                    other => other.to_string(),
                });
            }
        }
        state.load.clone()
    }

    /// Encrypts and submits a new trade, waits for inclusion, and reloads.
    ///
    /// A second call while an attempt is in flight is ignored and returns
    /// the running attempt's state.
    pub async fn create_trade(&self, form: TradeForm) -> CreateState {
        let (user, trade_id) = {
            let mut state = self.state.lock();
            if state.create.is_in_flight() {
                debug!("trade creation already in flight");
                return state.create.clone();
            }
            let Some(user) = self.clients.wallet.address() else {
                return state.fail_create(TradeError::NotConnected);
            };
            if !form.is_complete() {
                return state.fail_create(TradeError::InvalidInput(
                    "amount and price are required".to_string(),
                ));
            }

            let trade_id = new_trade_id(Utc::now());
            state.create = CreateState::Encrypting {
                trade_id: trade_id.clone(),
            };
            state.notify(NotificationKind::Pending, "Encrypting trade intent with FHE...");
            (user, trade_id)
        };

        info!(%trade_id, pair = %form.pair, side = form.side.as_str(), "creating trade");

        if let Err(error) = self.submit_trade(&form, &user, &trade_id).await {
            return self.state.lock().fail_create(error);
        }

        {
            let mut state = self.state.lock();
            state.create = CreateState::Succeeded {
                trade_id: trade_id.clone(),
            };
            state.notify(NotificationKind::Success, "Trade created with FHE protection!");
        }
        info!(%trade_id, "trade created");

        self.reload().await;
        CreateState::Succeeded { trade_id }
    }

    async fn submit_trade(
        &self,
        form: &TradeForm,
        user: &Address,
        trade_id: &str,
    ) -> Result<TxReceipt, TradeError> {
        let contract = self.clients.reader.address().clone();
        let amount = form.amount_value();

        let encrypted = self
            .clients
            .compute
            .encrypt(&contract, user, amount)
            .await
            .map_err(|e| TradeError::from_encryption(&e))?;

        self.state.lock().create = CreateState::Submitting {
            trade_id: trade_id.to_string(),
        };

        let request = CreateBusinessRequest {
            id: trade_id.to_string(),
            name: form.pair.as_str().to_string(),
            encrypted_amount: encrypted.encrypted_data,
            input_proof: encrypted.proof,
            public_value1: amount,
            public_value2: form.price_value(),
            label: form.label(),
        };
        let pending = self
            .clients
            .writer
            .create_business_data(request)
            .await
            .map_err(|e| TradeError::from_submission(&e))?;

        {
            let mut state = self.state.lock();
            state.create = CreateState::Confirming {
                trade_id: trade_id.to_string(),
                tx_hash: pending.hash().to_string(),
            };
            state.notify(NotificationKind::Pending, "Submitting encrypted trade...");
        }
        debug!(%trade_id, tx_hash = pending.hash(), "awaiting inclusion");

        pending
            .wait()
            .await
            .map_err(|e| TradeError::from_submission(&e))
    }

    /// Requests decryption and on-chain verification of a trade's amount.
    ///
    /// An already-verified record short-circuits without calling the
    /// confidential-compute client.
    pub async fn decrypt_trade(&self, trade_id: &str) -> DecryptState {
        {
            let mut state = self.state.lock();
            if state.decrypt.is_in_flight() {
                debug!("decryption already in flight");
                return state.decrypt.clone();
            }
            if !self.clients.wallet.is_connected() {
                return state.fail_decrypt(trade_id, TradeError::NotConnected);
            }
            state.decrypt = DecryptState::VerificationRequested {
                trade_id: trade_id.to_string(),
            };
        }

        info!(%trade_id, "requesting decryption");
        let outcome = self.request_verification(trade_id).await;

        let mut state = self.state.lock();
        match outcome {
            Ok(done) => {
                state.decrypt = done;
                state.decrypt.clone()
            }
            Err(error) => state.fail_decrypt(trade_id, error),
        }
    }

    async fn request_verification(&self, trade_id: &str) -> Result<DecryptState, TradeError> {
        let reader = &self.clients.reader;

        let record = reader
            .get_business_data(trade_id)
            .await
            .map_err(|e| TradeError::from_decryption(&e))?;

        if record.is_verified {
            info!(%trade_id, "trade already verified");
            let mut state = self.state.lock();
            state.mark_verified(trade_id, record.decrypted_value);
            state.notify(NotificationKind::Success, "Trade already verified on-chain");
            return Ok(DecryptState::AlreadyVerified {
                trade_id: trade_id.to_string(),
                value: Some(record.decrypted_value),
            });
        }

        let handle = reader
            .get_encrypted_value(trade_id)
            .await
            .map_err(|e| TradeError::from_decryption(&e))?;
        let contract = reader.address().clone();
        let verifier = RecordVerifier::new(self.clients.writer.as_ref(), trade_id);

        let result = match self
            .clients
            .compute
            .verify_decryption(&[handle], &contract, &verifier)
            .await
        {
            Ok(result) => result,
            Err(e) if is_already_verified(&e) => {
                info!(%trade_id, "trade was verified concurrently");
                let load = self.reload().await;
                let mut state = self.state.lock();
                // A failed reload keeps its own error notification.
                if !matches!(load, LoadState::Failed(_)) {
                    state.notify(NotificationKind::Success, "Trade is already verified");
                }
                let value = state.trade(trade_id).and_then(TradeData::decrypted_amount);
                return Ok(DecryptState::AlreadyVerified {
                    trade_id: trade_id.to_string(),
                    value,
                });
            }
            Err(e) => return Err(TradeError::from_decryption(&e)),
        };

        let value = result.clear_values.get(&handle).copied().ok_or_else(|| {
            TradeError::DecryptionFailure(format!("no clear value returned for {handle}"))
        })?;

        self.state
            .lock()
            .notify(NotificationKind::Pending, "Verifying trade decryption...");
        self.reload().await;
        self.state
            .lock()
            .notify(NotificationKind::Success, "Trade verified successfully!");
        info!(%trade_id, value, "trade verified");

        Ok(DecryptState::Verified {
            trade_id: trade_id.to_string(),
            value,
        })
    }

    /// Queries the contract's availability and reports it as a notification.
    ///
    /// Returns `None` if the call itself failed.
    pub async fn check_availability(&self) -> Option<bool> {
        let result = self.clients.reader.is_available().await;

        let mut state = self.state.lock();
        match result {
            Ok(true) => {
                state.notify(NotificationKind::Success, "Contract is available!");
                Some(true)
            }
            Ok(false) => {
                state.notify(NotificationKind::Error, "Contract is not available");
                Some(false)
            }
            Err(e) => {
                warn!(error = %e, "availability check failed");
                state.notify(NotificationKind::Error, "Contract call failed");
                None
            }
        }
    }
}
