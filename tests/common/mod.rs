//! Shared test utilities: a scripted stand-in for every collaborator that
//! counts the calls made against it.

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use parking_lot::Mutex;

use mevshield::TradeController;
use mevshield::client::{
    CiphertextHandle, ClientError, Clients, ConfidentialCompute, ContractReader, ContractWriter,
    CreateBusinessRequest, DecryptionResult, DecryptionSubmitter, EncryptedInput,
    PendingTransaction, PendingTx, TxReceipt, WalletProvider, decode_clear_values,
    encode_clear_values,
};
use mevshield::models::{Address, BusinessData, Pair, TradeForm, TradeSide};

pub const CONTRACT: &str = "0x5FbDB2315678afecb367f032d93F642f64180aa3";
pub const USER: &str = "0xf39Fd6e51aad88F6F4ce6aB8827279cffFb92266";
pub const OTHER: &str = "0x70997970C51812dc3A010C7d01b50e0d17dc79C8";

/// Number of calls made to each collaborator operation.
#[derive(Default)]
pub struct Calls {
    pub list_ids: AtomicUsize,
    pub get_data: AtomicUsize,
    pub get_handle: AtomicUsize,
    pub is_available: AtomicUsize,
    pub create: AtomicUsize,
    pub submit_verification: AtomicUsize,
    pub initialize: AtomicUsize,
    pub encrypt: AtomicUsize,
    pub verify_decryption: AtomicUsize,
}

impl Calls {
    pub fn count(counter: &AtomicUsize) -> usize {
        counter.load(Ordering::SeqCst)
    }

    /// Calls that reach the contract or the compute client.
    pub fn remote_total(&self) -> usize {
        [
            &self.list_ids,
            &self.get_data,
            &self.get_handle,
            &self.is_available,
            &self.create,
            &self.submit_verification,
            &self.initialize,
            &self.encrypt,
            &self.verify_decryption,
        ]
        .iter()
        .map(|c| c.load(Ordering::SeqCst))
        .sum()
    }
}

struct MockRecord {
    id: String,
    data: BusinessData,
    handle: CiphertextHandle,
}

/// Failures and behaviors a test can script before running a flow.
#[derive(Default)]
pub struct Script {
    pub list_ids_error: Option<String>,
    /// Delays the next id listing after its ids were read, so the
    /// listing it returns is already out of date. Applies once.
    pub slow_next_listing: Option<Duration>,
    /// Ids whose `get_business_data` call fails.
    pub broken_records: Vec<String>,
    pub init_error: Option<String>,
    pub encrypt_error: Option<String>,
    pub encrypt_delay: Option<Duration>,
    pub create_error: Option<String>,
    pub verify_error: Option<String>,
    /// Another session verifies the record while our decryption is running.
    pub verify_race: bool,
    pub available: Option<Result<bool, String>>,
}

/// Scripted contract, compute client, and wallet over one record list.
pub struct MockNetwork {
    pub calls: Calls,
    pub script: Mutex<Script>,
    records: Mutex<Vec<MockRecord>>,
    ciphertexts: Mutex<HashMap<CiphertextHandle, u64>>,
    next_handle: AtomicUsize,
    connected: AtomicBool,
    initialized: AtomicBool,
    contract: Address,
    user: Address,
}

impl MockNetwork {
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            calls: Calls::default(),
            script: Mutex::new(Script::default()),
            records: Mutex::new(Vec::new()),
            ciphertexts: Mutex::new(HashMap::new()),
            next_handle: AtomicUsize::new(1),
            connected: AtomicBool::new(false),
            initialized: AtomicBool::new(false),
            contract: Address::new(CONTRACT),
            user: Address::new(USER),
        })
    }

    /// A network with the wallet connected and the compute client ready.
    pub fn ready() -> Arc<Self> {
        let network = Self::new();
        network.connected.store(true, Ordering::SeqCst);
        network.initialized.store(true, Ordering::SeqCst);
        network
    }

    pub fn controller(self: &Arc<Self>) -> TradeController {
        TradeController::new(Clients {
            reader: self.clone(),
            writer: self.clone(),
            compute: self.clone(),
            wallet: self.clone(),
        })
    }

    pub fn set_connected(&self, connected: bool) {
        self.connected.store(connected, Ordering::SeqCst);
    }

    fn new_handle(&self, value: u64) -> CiphertextHandle {
        let n = self.next_handle.fetch_add(1, Ordering::SeqCst);
        let mut bytes = [0u8; 32];
        bytes[24..].copy_from_slice(&(n as u64).to_be_bytes());
        let handle = CiphertextHandle::from_bytes(bytes);
        self.ciphertexts.lock().insert(handle, value);
        handle
    }

    /// Stores a record directly, as if created earlier.
    pub fn insert_record(&self, id: &str, data: BusinessData) {
        let handle = self.new_handle(data.public_value1);
        self.records.lock().push(MockRecord {
            id: id.to_string(),
            data,
            handle,
        });
    }

    pub fn record(&self, id: &str) -> Option<BusinessData> {
        self.records
            .lock()
            .iter()
            .find(|r| r.id == id)
            .map(|r| r.data.clone())
    }

    pub fn update_record(&self, id: &str, f: impl FnOnce(&mut BusinessData)) {
        if let Some(record) = self.records.lock().iter_mut().find(|r| r.id == id) {
            f(&mut record.data);
        }
    }

    pub fn record_count(&self) -> usize {
        self.records.lock().len()
    }

    fn scripted_error(&self, pick: impl FnOnce(&Script) -> Option<String>) -> Result<(), ClientError> {
        match pick(&*self.script.lock()) {
            Some(message) => Err(ClientError::new(message)),
            None => Ok(()),
        }
    }
}

/// A business record with the given public values.
pub fn business(pair: &str, amount: u64, price: u64, creator: &str, verified: bool) -> BusinessData {
    BusinessData {
        name: pair.to_string(),
        public_value1: amount,
        public_value2: price,
        timestamp: 1_700_000_000,
        creator: Address::new(creator),
        decrypted_value: if verified { amount } else { 0 },
        is_verified: verified,
    }
}

/// A filled-in creation form.
pub fn form(amount: &str, price: &str) -> TradeForm {
    TradeForm {
        pair: Pair::EthUsdt,
        side: TradeSide::Buy,
        amount: amount.to_string(),
        price: price.to_string(),
    }
}

struct MockTx {
    hash: String,
}

#[async_trait]
impl PendingTransaction for MockTx {
    fn hash(&self) -> &str {
        &self.hash
    }

    async fn wait(self: Box<Self>) -> Result<TxReceipt, ClientError> {
        Ok(TxReceipt {
            hash: self.hash,
            block_number: 1,
        })
    }
}

fn mined(hash: &str) -> PendingTx {
    Box::new(MockTx {
        hash: hash.to_string(),
    })
}

#[async_trait]
impl ContractReader for MockNetwork {
    fn address(&self) -> &Address {
        &self.contract
    }

    async fn get_all_business_ids(&self) -> Result<Vec<String>, ClientError> {
        self.calls.list_ids.fetch_add(1, Ordering::SeqCst);
        self.scripted_error(|s| s.list_ids_error.clone())?;
        let ids: Vec<String> = self.records.lock().iter().map(|r| r.id.clone()).collect();
        let delay = self.script.lock().slow_next_listing.take();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
        Ok(ids)
    }

    async fn get_business_data(&self, id: &str) -> Result<BusinessData, ClientError> {
        self.calls.get_data.fetch_add(1, Ordering::SeqCst);
        if self.script.lock().broken_records.iter().any(|b| b == id) {
            return Err(ClientError::new("call revert exception"));
        }
        self.record(id)
            .ok_or_else(|| ClientError::new("Business data does not exist"))
    }

    async fn get_encrypted_value(&self, id: &str) -> Result<CiphertextHandle, ClientError> {
        self.calls.get_handle.fetch_add(1, Ordering::SeqCst);
        self.records
            .lock()
            .iter()
            .find(|r| r.id == id)
            .map(|r| r.handle)
            .ok_or_else(|| ClientError::new("Business data does not exist"))
    }

    async fn is_available(&self) -> Result<bool, ClientError> {
        self.calls.is_available.fetch_add(1, Ordering::SeqCst);
        match self.script.lock().available.clone() {
            None => Ok(true),
            Some(result) => result.map_err(ClientError::new),
        }
    }
}

#[async_trait]
impl ContractWriter for MockNetwork {
    async fn create_business_data(
        &self,
        request: CreateBusinessRequest,
    ) -> Result<PendingTx, ClientError> {
        self.calls.create.fetch_add(1, Ordering::SeqCst);
        self.scripted_error(|s| s.create_error.clone())?;
        self.records.lock().push(MockRecord {
            id: request.id,
            data: BusinessData {
                name: request.name,
                public_value1: request.public_value1,
                public_value2: request.public_value2,
                timestamp: 1_700_000_100,
                creator: self.user.clone(),
                decrypted_value: 0,
                is_verified: false,
            },
            handle: request.encrypted_amount,
        });
        Ok(mined("0xc0ffee"))
    }

    async fn verify_decryption(
        &self,
        id: &str,
        clear_values: Vec<u8>,
        _proof: Vec<u8>,
    ) -> Result<PendingTx, ClientError> {
        self.calls.submit_verification.fetch_add(1, Ordering::SeqCst);
        let value = decode_clear_values(&clear_values)
            .and_then(|v| v.first().copied())
            .ok_or_else(|| ClientError::new("bad clear values"))?;

        let mut records = self.records.lock();
        let record = records
            .iter_mut()
            .find(|r| r.id == id)
            .ok_or_else(|| ClientError::new("Business data does not exist"))?;
        if record.data.is_verified {
            return Err(ClientError::new("execution reverted: Data already verified"));
        }
        record.data.is_verified = true;
        record.data.decrypted_value = value;
        Ok(mined("0xdec0de"))
    }
}

#[async_trait]
impl ConfidentialCompute for MockNetwork {
    async fn initialize(&self) -> Result<(), ClientError> {
        self.calls.initialize.fetch_add(1, Ordering::SeqCst);
        self.scripted_error(|s| s.init_error.clone())?;
        self.initialized.store(true, Ordering::SeqCst);
        Ok(())
    }

    fn is_initialized(&self) -> bool {
        self.initialized.load(Ordering::SeqCst)
    }

    async fn encrypt(
        &self,
        _contract: &Address,
        _user: &Address,
        value: u64,
    ) -> Result<EncryptedInput, ClientError> {
        self.calls.encrypt.fetch_add(1, Ordering::SeqCst);
        let delay = self.script.lock().encrypt_delay;
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
        self.scripted_error(|s| s.encrypt_error.clone())?;
        Ok(EncryptedInput {
            encrypted_data: self.new_handle(value),
            proof: vec![0xaa; 32],
        })
    }

    async fn verify_decryption(
        &self,
        handles: &[CiphertextHandle],
        _contract: &Address,
        submit: &dyn DecryptionSubmitter,
    ) -> Result<DecryptionResult, ClientError> {
        self.calls.verify_decryption.fetch_add(1, Ordering::SeqCst);
        self.scripted_error(|s| s.verify_error.clone())?;

        let values: Vec<u64> = {
            let ciphertexts = self.ciphertexts.lock();
            handles
                .iter()
                .map(|h| ciphertexts.get(h).copied().unwrap_or_default())
                .collect()
        };

        if self.script.lock().verify_race {
            let mut records = self.records.lock();
            for record in records.iter_mut().filter(|r| handles.contains(&r.handle)) {
                record.data.is_verified = true;
                record.data.decrypted_value = record.data.public_value1;
            }
        }

        let tx = submit.submit(encode_clear_values(&values), vec![0xbb; 32]).await?;
        tx.wait().await?;

        Ok(DecryptionResult {
            clear_values: handles.iter().copied().zip(values).collect(),
        })
    }
}

#[async_trait]
impl WalletProvider for MockNetwork {
    fn address(&self) -> Option<Address> {
        self.connected
            .load(Ordering::SeqCst)
            .then(|| self.user.clone())
    }

    async fn connect(&self) -> Result<Address, ClientError> {
        self.connected.store(true, Ordering::SeqCst);
        Ok(self.user.clone())
    }

    fn disconnect(&self) {
        self.connected.store(false, Ordering::SeqCst);
    }
}
