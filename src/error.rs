//! Crate-level error types.
//!
//! [`MevShieldError`] unifies the failures that can abort the binary
//! (configuration, terminal I/O, collaborator calls, JSON output) so `main`
//! can use the `?` operator throughout. [`TradeError`] is the narrower
//! taxonomy the trade flows surface to the user; those never escape a flow.

use crate::client::ClientError;

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, MevShieldError>;

/// Top-level error type returned by the binary entry points.
#[derive(Debug, thiserror::Error)]
pub enum MevShieldError {
    /// An environment variable held an invalid value.
    #[error("configuration error: {0}")]
    Config(String),

    /// Terminal or file I/O failed.
    #[error("io error: {0}")]
    Io(String),

    /// A contract or confidential-compute call failed outside a trade flow.
    #[error("client error: {0}")]
    Client(#[from] ClientError),

    /// JSON serialization failed.
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Substring of the wallet error raised when the user declines to sign.
const USER_REJECTED_MARKER: &str = "user rejected transaction";

/// Substring of the contract revert raised when a record was verified by someone else.
const ALREADY_VERIFIED_MARKER: &str = "Data already verified";

/// Why a trade flow ended in its failed state.
///
/// Every variant renders to the exact text shown in the notification toast.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TradeError {
    /// No wallet is connected; no remote call was made.
    #[error("Please connect wallet first")]
    NotConnected,

    /// The trade form is missing a required field.
    #[error("Invalid trade: {0}")]
    InvalidInput(String),

    /// The confidential-compute client could not be initialized.
    #[error("FHEVM initialization failed")]
    ComputeUnavailable(String),

    /// Encrypting the amount (or generating its proof) failed.
    #[error("Encryption failed: {0}")]
    EncryptionFailure(String),

    /// The wallet user declined to sign the transaction.
    #[error("Transaction rejected")]
    UserRejectedSignature,

    /// The contract write or its inclusion failed.
    #[error("Submission failed: {0}")]
    SubmissionFailure(String),

    /// The decryption request or its on-chain verification failed.
    #[error("Decryption failed: {0}")]
    DecryptionFailure(String),

    /// The trade collection could not be fetched.
    #[error("Failed to load data")]
    LoadFailure(String),
}

impl TradeError {
    /// Classifies a failed contract write from a creation flow.
    pub fn from_submission(err: &ClientError) -> Self {
        if is_user_rejection(err) {
            Self::UserRejectedSignature
        } else {
            Self::SubmissionFailure(detail(err))
        }
    }

    /// Classifies a failed verify-decryption call.
    pub fn from_decryption(err: &ClientError) -> Self {
        if is_user_rejection(err) {
            Self::UserRejectedSignature
        } else {
            Self::DecryptionFailure(detail(err))
        }
    }

    /// Wraps a failed encryption call.
    pub fn from_encryption(err: &ClientError) -> Self {
        Self::EncryptionFailure(detail(err))
    }
}

/// Returns whether the failure means the user declined the wallet prompt.
pub fn is_user_rejection(err: &ClientError) -> bool {
    err.message()
        .to_ascii_lowercase()
        .contains(USER_REJECTED_MARKER)
}

/// Returns whether the failure means the record was already verified on-chain.
pub fn is_already_verified(err: &ClientError) -> bool {
    err.message().contains(ALREADY_VERIFIED_MARKER)
}

/// Underlying error text, or a generic placeholder when the remote gave none.
fn detail(err: &ClientError) -> String {
    let message = err.message().trim();
    if message.is_empty() {
        "Unknown error".to_string()
    } else {
        message.to_string()
    }
}
