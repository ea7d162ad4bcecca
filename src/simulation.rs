//! In-process stand-in for the deployed contract, the FHE service, and the wallet.
//!
//! [`SimulatedNetwork`] implements every collaborator trait over one shared
//! ledger so the front end can run without a chain. Ciphertext handles are
//! SHA-256 digests whose cleartext is held by the simulated decryption
//! gateway, and input/decryption proofs are HMAC-SHA256 tags the simulated
//! contract checks before accepting a write. The controller sees the same
//! call shapes and failure messages it would from the real services.

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;
use hmac::{Hmac, Mac};
use parking_lot::Mutex;
use sha2::{Digest, Sha256};
use tracing::{debug, info};

use crate::client::{
    CiphertextHandle, ClientError, Clients, ConfidentialCompute, ContractReader, ContractWriter,
    CreateBusinessRequest, DecryptionResult, DecryptionSubmitter, EncryptedInput,
    PendingTransaction, PendingTx, TxReceipt, WalletProvider, decode_clear_values,
    encode_clear_values,
};
use crate::models::{Address, BusinessData, Pair};

type HmacSha256 = Hmac<Sha256>;

/// Key shared by the simulated gateway and contract for proof tags.
const PROOF_KEY: &[u8] = b"mevshield-simulated-gateway";

/// Domain separators so an input proof can never pass as a decryption proof.
const INPUT_PROOF_DOMAIN: &[u8] = b"input";
const DECRYPTION_PROOF_DOMAIN: &[u8] = b"decrypt";

/// Revert reason for a second verification of the same record.
pub const ALREADY_VERIFIED_REVERT: &str = "Data already verified";

/// Wallet error raised when signature rejection is simulated.
pub const USER_REJECTED_ERROR: &str = "user rejected transaction";

/// Knobs for the simulated network.
#[derive(Clone, Debug)]
pub struct SimulationConfig {
    /// Delay applied to every remote call and to each transaction's inclusion.
    pub latency: Duration,
    /// Makes every signer-bound call fail as if the user declined it.
    pub reject_signatures: bool,
    /// Populates the ledger with a handful of demo trades.
    pub seed_demo_trades: bool,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            latency: Duration::from_millis(400),
            reject_signatures: false,
            seed_demo_trades: true,
        }
    }
}

/// A record as held by the simulated contract.
#[derive(Debug, Clone)]
struct StoredRecord {
    id: String,
    data: BusinessData,
    handle: CiphertextHandle,
    label: String,
}

/// Contract storage plus the gateway's view of the ciphertexts.
#[derive(Debug, Default)]
struct Ledger {
    /// Records in creation order.
    records: Vec<StoredRecord>,
    /// Cleartext behind each handle, as known to the decryption gateway.
    ciphertexts: HashMap<CiphertextHandle, u64>,
    next_nonce: u64,
    next_tx: u64,
    block_number: u64,
    available: bool,
}

impl Ledger {
    fn record(&self, id: &str) -> Option<&StoredRecord> {
        self.records.iter().find(|r| r.id == id)
    }

    fn record_mut(&mut self, id: &str) -> Option<&mut StoredRecord> {
        self.records.iter_mut().find(|r| r.id == id)
    }

    fn next_nonce(&mut self) -> u64 {
        let nonce = self.next_nonce;
        self.next_nonce += 1;
        nonce
    }

    /// Mines a transaction and returns its receipt.
    fn mine(&mut self) -> TxReceipt {
        self.next_tx += 1;
        self.block_number += 1;
        let digest = Sha256::digest(format!("tx-{}", self.next_tx).as_bytes());
        TxReceipt {
            hash: format!("0x{}", hex::encode(digest)),
            block_number: self.block_number,
        }
    }

    /// Registers a cleartext with the gateway and returns its handle.
    fn register_ciphertext(&mut self, contract: &Address, user: &Address, value: u64) -> CiphertextHandle {
        let nonce = self.next_nonce();
        let mut hasher = Sha256::new();
        hasher.update(contract.as_str().to_lowercase().as_bytes());
        hasher.update(user.as_str().to_lowercase().as_bytes());
        hasher.update(nonce.to_be_bytes());
        hasher.update(value.to_be_bytes());
        let handle = CiphertextHandle::from_bytes(hasher.finalize().into());
        self.ciphertexts.insert(handle, value);
        handle
    }
}

/// State shared by every simulated collaborator.
struct Shared {
    config: SimulationConfig,
    contract_address: Address,
    ledger: Mutex<Ledger>,
}

impl Shared {
    async fn delay(&self) {
        if !self.config.latency.is_zero() {
            tokio::time::sleep(self.config.latency).await;
        }
    }

    fn pending(&self, receipt: TxReceipt) -> PendingTx {
        Box::new(SimulatedTx {
            receipt,
            latency: self.config.latency,
        })
    }
}

fn keyed_mac(domain: &[u8], parts: &[&[u8]]) -> Result<HmacSha256, ClientError> {
    let mut mac = HmacSha256::new_from_slice(PROOF_KEY)
        .map_err(|e| ClientError::new(format!("invalid HMAC key: {e}")))?;
    mac.update(domain);
    for part in parts {
        mac.update(part);
    }
    Ok(mac)
}

/// Computes a proof tag over `parts` in the given domain.
fn proof_tag(domain: &[u8], parts: &[&[u8]]) -> Result<Vec<u8>, ClientError> {
    Ok(keyed_mac(domain, parts)?.finalize().into_bytes().to_vec())
}

/// Checks a proof tag in constant time.
fn verify_tag(domain: &[u8], parts: &[&[u8]], tag: &[u8]) -> bool {
    keyed_mac(domain, parts).is_ok_and(|mac| mac.verify_slice(tag).is_ok())
}

/// A simulated transaction; included after the configured latency.
struct SimulatedTx {
    receipt: TxReceipt,
    latency: Duration,
}

#[async_trait]
impl PendingTransaction for SimulatedTx {
    fn hash(&self) -> &str {
        &self.receipt.hash
    }

    async fn wait(self: Box<Self>) -> Result<TxReceipt, ClientError> {
        if !self.latency.is_zero() {
            tokio::time::sleep(self.latency).await;
        }
        Ok(self.receipt)
    }
}

/// Simulated wallet holding one account.
pub struct SimulatedWallet {
    account: Address,
    connected: AtomicBool,
}

impl SimulatedWallet {
    pub fn new(account: Address) -> Self {
        Self {
            account,
            connected: AtomicBool::new(false),
        }
    }
}

#[async_trait]
impl WalletProvider for SimulatedWallet {
    fn address(&self) -> Option<Address> {
        self.connected
            .load(Ordering::SeqCst)
            .then(|| self.account.clone())
    }

    async fn connect(&self) -> Result<Address, ClientError> {
        self.connected.store(true, Ordering::SeqCst);
        Ok(self.account.clone())
    }

    fn disconnect(&self) {
        self.connected.store(false, Ordering::SeqCst);
    }
}

/// Simulated contract; serves both the read-only and the signer-bound handle.
pub struct SimulatedContract {
    shared: Arc<Shared>,
    wallet: Arc<SimulatedWallet>,
}

impl SimulatedContract {
    fn signer(&self) -> Result<Address, ClientError> {
        if self.shared.config.reject_signatures {
            return Err(ClientError::new(USER_REJECTED_ERROR));
        }
        self.wallet
            .address()
            .ok_or_else(|| ClientError::new("no signer connected"))
    }
}

#[async_trait]
impl ContractReader for SimulatedContract {
    fn address(&self) -> &Address {
        &self.shared.contract_address
    }

    async fn get_all_business_ids(&self) -> Result<Vec<String>, ClientError> {
        self.shared.delay().await;
        let ledger = self.shared.ledger.lock();
        Ok(ledger.records.iter().map(|r| r.id.clone()).collect())
    }

    async fn get_business_data(&self, id: &str) -> Result<BusinessData, ClientError> {
        self.shared.delay().await;
        let ledger = self.shared.ledger.lock();
        ledger
            .record(id)
            .map(|r| r.data.clone())
            .ok_or_else(|| ClientError::new("Business data does not exist"))
    }

    async fn get_encrypted_value(&self, id: &str) -> Result<CiphertextHandle, ClientError> {
        self.shared.delay().await;
        let ledger = self.shared.ledger.lock();
        ledger
            .record(id)
            .map(|r| r.handle)
            .ok_or_else(|| ClientError::new("Business data does not exist"))
    }

    async fn is_available(&self) -> Result<bool, ClientError> {
        self.shared.delay().await;
        Ok(self.shared.ledger.lock().available)
    }
}

#[async_trait]
impl ContractWriter for SimulatedContract {
    async fn create_business_data(
        &self,
        request: CreateBusinessRequest,
    ) -> Result<PendingTx, ClientError> {
        let signer = self.signer()?;
        self.shared.delay().await;

        let contract = self.shared.contract_address.as_str().to_lowercase();
        let user = signer.as_str().to_lowercase();
        if !verify_tag(
            INPUT_PROOF_DOMAIN,
            &[
                request.encrypted_amount.as_bytes(),
                contract.as_bytes(),
                user.as_bytes(),
            ],
            &request.input_proof,
        ) {
            return Err(ClientError::new("execution reverted: Invalid input proof"));
        }

        let mut ledger = self.shared.ledger.lock();
        if ledger.record(&request.id).is_some() {
            return Err(ClientError::new("execution reverted: Business data already exists"));
        }

        ledger.records.push(StoredRecord {
            id: request.id.clone(),
            data: BusinessData {
                name: request.name,
                public_value1: request.public_value1,
                public_value2: request.public_value2,
                timestamp: Utc::now().timestamp(),
                creator: signer,
                decrypted_value: 0,
                is_verified: false,
            },
            handle: request.encrypted_amount,
            label: request.label,
        });
        let receipt = ledger.mine();
        info!(trade_id = %request.id, tx_hash = %receipt.hash, "simulated trade stored");

        Ok(self.shared.pending(receipt))
    }

    async fn verify_decryption(
        &self,
        id: &str,
        clear_values: Vec<u8>,
        proof: Vec<u8>,
    ) -> Result<PendingTx, ClientError> {
        self.signer()?;
        self.shared.delay().await;

        let mut ledger = self.shared.ledger.lock();
        let record = ledger
            .record_mut(id)
            .ok_or_else(|| ClientError::new("execution reverted: Business data does not exist"))?;
        if record.data.is_verified {
            return Err(ClientError::new(format!(
                "execution reverted: {ALREADY_VERIFIED_REVERT}"
            )));
        }
        if !verify_tag(
            DECRYPTION_PROOF_DOMAIN,
            &[record.handle.as_bytes(), &clear_values],
            &proof,
        ) {
            return Err(ClientError::new("execution reverted: Invalid decryption proof"));
        }
        let value = decode_clear_values(&clear_values)
            .and_then(|values| values.first().copied())
            .ok_or_else(|| ClientError::new("execution reverted: Invalid clear values"))?;

        record.data.decrypted_value = value;
        record.data.is_verified = true;
        debug!(trade_id = %id, label = %record.label, "simulated decryption verified");

        let receipt = ledger.mine();
        Ok(self.shared.pending(receipt))
    }
}

/// Simulated confidential-compute client.
pub struct SimulatedCompute {
    shared: Arc<Shared>,
    initialized: AtomicBool,
}

impl SimulatedCompute {
    fn require_initialized(&self) -> Result<(), ClientError> {
        if self.initialized.load(Ordering::SeqCst) {
            Ok(())
        } else {
            Err(ClientError::new("FHEVM instance is not initialized"))
        }
    }
}

#[async_trait]
impl ConfidentialCompute for SimulatedCompute {
    async fn initialize(&self) -> Result<(), ClientError> {
        self.shared.delay().await;
        self.initialized.store(true, Ordering::SeqCst);
        Ok(())
    }

    fn is_initialized(&self) -> bool {
        self.initialized.load(Ordering::SeqCst)
    }

    async fn encrypt(
        &self,
        contract: &Address,
        user: &Address,
        value: u64,
    ) -> Result<EncryptedInput, ClientError> {
        self.require_initialized()?;
        self.shared.delay().await;

        let handle = self.shared.ledger.lock().register_ciphertext(contract, user, value);
        let contract = contract.as_str().to_lowercase();
        let user = user.as_str().to_lowercase();
        let proof = proof_tag(
            INPUT_PROOF_DOMAIN,
            &[handle.as_bytes(), contract.as_bytes(), user.as_bytes()],
        )?;

        Ok(EncryptedInput {
            encrypted_data: handle,
            proof,
        })
    }

    async fn verify_decryption(
        &self,
        handles: &[CiphertextHandle],
        _contract: &Address,
        submit: &dyn DecryptionSubmitter,
    ) -> Result<DecryptionResult, ClientError> {
        self.require_initialized()?;
        self.shared.delay().await;

        let values = {
            let ledger = self.shared.ledger.lock();
            handles
                .iter()
                .map(|h| {
                    ledger
                        .ciphertexts
                        .get(h)
                        .copied()
                        .ok_or_else(|| ClientError::new(format!("unknown ciphertext handle {h}")))
                })
                .collect::<Result<Vec<u64>, ClientError>>()?
        };

        let clear_values = encode_clear_values(&values);
        let mut parts: Vec<&[u8]> = handles.iter().map(|h| h.as_bytes().as_slice()).collect();
        parts.push(&clear_values);
        let proof = proof_tag(DECRYPTION_PROOF_DOMAIN, &parts)?;

        let tx = submit.submit(clear_values.clone(), proof).await?;
        tx.wait().await?;

        Ok(DecryptionResult {
            clear_values: handles.iter().copied().zip(values).collect(),
        })
    }
}

/// The simulated contract, compute client, and wallet over one ledger.
pub struct SimulatedNetwork {
    contract: Arc<SimulatedContract>,
    compute: Arc<SimulatedCompute>,
    wallet: Arc<SimulatedWallet>,
    shared: Arc<Shared>,
}

impl SimulatedNetwork {
    /// Creates a network whose wallet holds `account`.
    pub fn new(contract_address: Address, account: Address, config: SimulationConfig) -> Self {
        let seed = config.seed_demo_trades;
        let shared = Arc::new(Shared {
            config,
            contract_address,
            ledger: Mutex::new(Ledger {
                available: true,
                ..Ledger::default()
            }),
        });
        let wallet = Arc::new(SimulatedWallet::new(account));
        let network = Self {
            contract: Arc::new(SimulatedContract {
                shared: shared.clone(),
                wallet: wallet.clone(),
            }),
            compute: Arc::new(SimulatedCompute {
                shared: shared.clone(),
                initialized: AtomicBool::new(false),
            }),
            wallet,
            shared,
        };
        if seed {
            network.seed_demo_trades();
        }
        network
    }

    /// Collaborator handles for a [`TradeController`](crate::TradeController).
    pub fn clients(&self) -> Clients {
        Clients {
            reader: self.contract.clone(),
            writer: self.contract.clone(),
            compute: self.compute.clone(),
            wallet: self.wallet.clone(),
        }
    }

    /// Marks the contract available or unavailable.
    pub fn set_available(&self, available: bool) {
        self.shared.ledger.lock().available = available;
    }

    /// Number of records stored on the simulated contract.
    pub fn record_count(&self) -> usize {
        self.shared.ledger.lock().records.len()
    }

    /// Verifies a record directly, as another session would.
    ///
    /// Returns `false` if the record does not exist or is already verified.
    pub fn verify_out_of_band(&self, id: &str) -> bool {
        let mut ledger = self.shared.ledger.lock();
        let Some(handle) = ledger.record(id).map(|r| r.handle) else {
            return false;
        };
        let Some(value) = ledger.ciphertexts.get(&handle).copied() else {
            return false;
        };
        match ledger.record_mut(id) {
            Some(record) if !record.data.is_verified => {
                record.data.decrypted_value = value;
                record.data.is_verified = true;
                true
            }
            _ => false,
        }
    }

    fn seed_demo_trades(&self) {
        let demo = [
            ("0x70997970C51812dc3A010C7d01b50e0d17dc79C8", Pair::EthUsdt, 12, 2865, true),
            ("0x3C44CdDdB6a900fa2b585dd299e03d12FA4293BC", Pair::BtcUsdt, 2, 64210, false),
            ("0x90F79bf6EB2c4F870365E785982E1f101E93b906", Pair::SolUsdt, 0, 148, false),
            ("0x70997970C51812dc3A010C7d01b50e0d17dc79C8", Pair::EthUsdt, 5, 2840, false),
        ];

        let now = Utc::now().timestamp();
        let mut ledger = self.shared.ledger.lock();
        let contract = self.shared.contract_address.clone();
        for (i, (creator, pair, amount, price, verified)) in demo.into_iter().enumerate() {
            let creator = Address::new(creator);
            let handle = ledger.register_ciphertext(&contract, &creator, amount);
            let label = if amount > 0 { "BUY" } else { "SELL" };
            ledger.records.push(StoredRecord {
                id: format!("trade-demo-{}", i + 1),
                data: BusinessData {
                    name: pair.as_str().to_string(),
                    public_value1: amount,
                    public_value2: price,
                    timestamp: now - 600 * (4 - i as i64),
                    creator,
                    decrypted_value: if verified { amount } else { 0 },
                    is_verified: verified,
                },
                handle,
                label: format!("{label} Order - FHE Protected"),
            });
            ledger.mine();
        }
        debug!(count = ledger.records.len(), "seeded demo trades");
    }
}
