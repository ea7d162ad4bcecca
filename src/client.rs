//! Interfaces to the external collaborators.
//!
//! The contract (read-only and signer-bound handles) and the
//! confidential-compute client are remote services; this module only
//! describes the calls the trade flows make against them. Every failure is a
//! [`ClientError`] carrying the remote message text, which the flows classify
//! (see [`TradeError`](crate::TradeError)).

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use serde::{Serialize, Serializer};

use crate::models::{Address, BusinessData};

/// Width of one ABI-encoded `uint256` word.
const ABI_WORD_LEN: usize = 32;

/// A failed remote call, reduced to its message.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{message}")]
pub struct ClientError {
    message: String,
}

impl ClientError {
    /// Creates an error from the remote message text.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    /// Returns the remote message text.
    pub fn message(&self) -> &str {
        &self.message
    }
}

/// Opaque 32-byte reference to an encrypted value held by the contract.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct CiphertextHandle([u8; 32]);

impl CiphertextHandle {
    pub fn from_bytes(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }
}

impl fmt::Display for CiphertextHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{}", hex::encode(self.0))
    }
}

impl fmt::Debug for CiphertextHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "CiphertextHandle({self})")
    }
}

impl Serialize for CiphertextHandle {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Output of [`ConfidentialCompute::encrypt`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EncryptedInput {
    /// Handle to the encrypted value, passed to the contract in place of the cleartext.
    pub encrypted_data: CiphertextHandle,
    /// Input proof binding the handle to the contract and the user.
    pub proof: Vec<u8>,
}

/// Arguments of the contract's `createBusinessData` write.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CreateBusinessRequest {
    pub id: String,
    pub name: String,
    pub encrypted_amount: CiphertextHandle,
    pub input_proof: Vec<u8>,
    pub public_value1: u64,
    pub public_value2: u64,
    pub label: String,
}

/// A mined transaction.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TxReceipt {
    pub hash: String,
    pub block_number: u64,
}

/// A submitted transaction awaiting inclusion.
#[async_trait]
pub trait PendingTransaction: Send {
    /// Transaction hash, known as soon as the transaction is broadcast.
    fn hash(&self) -> &str;

    /// Waits until the transaction is included.
    ///
    /// There is no client-side timeout; the call settles when the transport does.
    async fn wait(self: Box<Self>) -> Result<TxReceipt, ClientError>;
}

/// Boxed [`PendingTransaction`] returned by contract writes.
pub type PendingTx = Box<dyn PendingTransaction>;

/// Read-only contract handle.
#[async_trait]
pub trait ContractReader: Send + Sync {
    /// Deployed contract address.
    fn address(&self) -> &Address;

    async fn get_all_business_ids(&self) -> Result<Vec<String>, ClientError>;

    async fn get_business_data(&self, id: &str) -> Result<BusinessData, ClientError>;

    /// Returns the handle of the record's encrypted amount.
    async fn get_encrypted_value(&self, id: &str) -> Result<CiphertextHandle, ClientError>;

    async fn is_available(&self) -> Result<bool, ClientError>;
}

/// Signer-bound contract handle.
#[async_trait]
pub trait ContractWriter: Send + Sync {
    async fn create_business_data(
        &self,
        request: CreateBusinessRequest,
    ) -> Result<PendingTx, ClientError>;

    /// Submits ABI-encoded clear values and their decryption proof for a record.
    async fn verify_decryption(
        &self,
        id: &str,
        clear_values: Vec<u8>,
        proof: Vec<u8>,
    ) -> Result<PendingTx, ClientError>;
}

/// Decrypted values keyed by the handle they were requested for.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct DecryptionResult {
    pub clear_values: HashMap<CiphertextHandle, u64>,
}

/// Callback used by the confidential-compute client to publish a decryption
/// on-chain once it has the clear values and their proof.
#[async_trait]
pub trait DecryptionSubmitter: Send + Sync {
    async fn submit(&self, clear_values: Vec<u8>, proof: Vec<u8>) -> Result<PendingTx, ClientError>;
}

/// Confidential-compute (FHE) client.
#[async_trait]
pub trait ConfidentialCompute: Send + Sync {
    /// Prepares the client. Idempotent once it has succeeded.
    async fn initialize(&self) -> Result<(), ClientError>;

    fn is_initialized(&self) -> bool;

    /// Encrypts `value` for use by `contract` on behalf of `user`.
    async fn encrypt(
        &self,
        contract: &Address,
        user: &Address,
        value: u64,
    ) -> Result<EncryptedInput, ClientError>;

    /// Decrypts `handles`, hands the result to `submit` for on-chain
    /// verification, and waits for that transaction to be included.
    async fn verify_decryption(
        &self,
        handles: &[CiphertextHandle],
        contract: &Address,
        submit: &dyn DecryptionSubmitter,
    ) -> Result<DecryptionResult, ClientError>;
}

/// Wallet/session provider.
#[async_trait]
pub trait WalletProvider: Send + Sync {
    /// The connected account, or `None` while disconnected.
    fn address(&self) -> Option<Address>;

    fn is_connected(&self) -> bool {
        self.address().is_some()
    }

    /// Asks the wallet to connect and returns the connected account.
    async fn connect(&self) -> Result<Address, ClientError>;

    fn disconnect(&self);
}

/// The set of collaborator handles a controller works against.
#[derive(Clone)]
pub struct Clients {
    pub reader: Arc<dyn ContractReader>,
    pub writer: Arc<dyn ContractWriter>,
    pub compute: Arc<dyn ConfidentialCompute>,
    pub wallet: Arc<dyn WalletProvider>,
}

/// Publishes a decryption for one record through the signer-bound contract.
pub struct RecordVerifier<'a> {
    writer: &'a dyn ContractWriter,
    id: &'a str,
}

impl<'a> RecordVerifier<'a> {
    pub fn new(writer: &'a dyn ContractWriter, id: &'a str) -> Self {
        Self { writer, id }
    }
}

#[async_trait]
impl DecryptionSubmitter for RecordVerifier<'_> {
    async fn submit(&self, clear_values: Vec<u8>, proof: Vec<u8>) -> Result<PendingTx, ClientError> {
        self.writer
            .verify_decryption(self.id, clear_values, proof)
            .await
    }
}

/// ABI-encodes values as consecutive big-endian `uint256` words.
pub fn encode_clear_values(values: &[u64]) -> Vec<u8> {
    let mut out = Vec::with_capacity(values.len() * ABI_WORD_LEN);
    for value in values {
        out.extend_from_slice(&[0u8; ABI_WORD_LEN - 8]);
        out.extend_from_slice(&value.to_be_bytes());
    }
    out
}

/// Decodes the output of [`encode_clear_values`].
///
/// Returns `None` if the input is not a whole number of words or a word
/// does not fit in a `u64`.
pub fn decode_clear_values(bytes: &[u8]) -> Option<Vec<u64>> {
    if bytes.len() % ABI_WORD_LEN != 0 {
        return None;
    }
    bytes
        .chunks_exact(ABI_WORD_LEN)
        .map(|word| {
            let (high, low) = word.split_at(ABI_WORD_LEN - 8);
            if high.iter().any(|b| *b != 0) {
                return None;
            }
            let low: [u8; 8] = low.try_into().ok()?;
            Some(u64::from_be_bytes(low))
        })
        .collect()
}
