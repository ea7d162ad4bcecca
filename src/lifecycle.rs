//! Explicit state machines for the trade flows.
//!
//! Each flow class has exactly one state value, so an in-progress marker and
//! a terminal outcome can never be held at the same time.

use crate::error::TradeError;

/// Progress of one trade-creation attempt.
///
/// `Idle → Encrypting → Submitting → Confirming → Succeeded`, with any
/// step able to end in `Failed`.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum CreateState {
    #[default]
    Idle,
    /// The amount is being encrypted by the confidential-compute client.
    Encrypting { trade_id: String },
    /// The encrypted payload is being sent to the contract.
    Submitting { trade_id: String },
    /// The transaction was broadcast and is awaiting inclusion.
    Confirming { trade_id: String, tx_hash: String },
    Succeeded { trade_id: String },
    Failed(TradeError),
}

impl CreateState {
    /// Whether an attempt is currently running.
    pub fn is_in_flight(&self) -> bool {
        matches!(
            self,
            CreateState::Encrypting { .. }
                | CreateState::Submitting { .. }
                | CreateState::Confirming { .. }
        )
    }

    /// Short progress label for the submit button.
    pub fn label(&self) -> &'static str {
        match self {
            CreateState::Idle => "Create Protected Trade",
            CreateState::Encrypting { .. } => "Encrypting Trade...",
            CreateState::Submitting { .. } => "Submitting Trade...",
            CreateState::Confirming { .. } => "Confirming...",
            CreateState::Succeeded { .. } => "Trade Created",
            CreateState::Failed(_) => "Retry",
        }
    }
}

/// Progress of one decryption request for a selected trade.
///
/// `Idle` is the encrypted, not-yet-requested state. A request moves to
/// `VerificationRequested` and ends in `Verified`, `AlreadyVerified`, or
/// `Failed`.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum DecryptState {
    #[default]
    Idle,
    VerificationRequested { trade_id: String },
    /// The cleartext was decrypted and accepted on-chain by this request.
    Verified { trade_id: String, value: u64 },
    /// The record was verified before this request, by anyone. `value` is
    /// the stored cleartext when it could be read back.
    AlreadyVerified { trade_id: String, value: Option<u64> },
    Failed { trade_id: String, error: TradeError },
}

impl DecryptState {
    pub fn is_in_flight(&self) -> bool {
        matches!(self, DecryptState::VerificationRequested { .. })
    }

    /// The trade this state refers to, if any.
    pub fn trade_id(&self) -> Option<&str> {
        match self {
            DecryptState::Idle => None,
            DecryptState::VerificationRequested { trade_id }
            | DecryptState::Verified { trade_id, .. }
            | DecryptState::AlreadyVerified { trade_id, .. }
            | DecryptState::Failed { trade_id, .. } => Some(trade_id),
        }
    }

    /// The cleartext surfaced by a successful request.
    pub fn revealed_value(&self) -> Option<u64> {
        match self {
            DecryptState::Verified { value, .. } => Some(*value),
            DecryptState::AlreadyVerified { value, .. } => *value,
            _ => None,
        }
    }
}

/// Readiness of the confidential-compute client.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum ComputeStatus {
    #[default]
    Uninitialized,
    /// An initialization call is running; further attempts are skipped.
    Initializing,
    Ready,
    Failed(String),
}

impl ComputeStatus {
    pub fn is_ready(&self) -> bool {
        matches!(self, ComputeStatus::Ready)
    }
}

/// State of the trade collection.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum LoadState {
    #[default]
    NotLoaded,
    Loading,
    Loaded,
    Failed(String),
}

impl LoadState {
    pub fn is_loading(&self) -> bool {
        matches!(self, LoadState::Loading)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_intermediate_create_states_are_in_flight() {
        let id = || "trade-1".to_string();
        assert!(!CreateState::Idle.is_in_flight());
        assert!(CreateState::Encrypting { trade_id: id() }.is_in_flight());
        assert!(CreateState::Submitting { trade_id: id() }.is_in_flight());
        assert!(
            CreateState::Confirming {
                trade_id: id(),
                tx_hash: "0x1".to_string()
            }
            .is_in_flight()
        );
        assert!(!CreateState::Succeeded { trade_id: id() }.is_in_flight());
        assert!(!CreateState::Failed(TradeError::NotConnected).is_in_flight());
    }

    #[test]
    fn decrypt_state_exposes_trade_and_value() {
        let verified = DecryptState::Verified {
            trade_id: "trade-9".to_string(),
            value: 12,
        };
        assert_eq!(verified.trade_id(), Some("trade-9"));
        assert_eq!(verified.revealed_value(), Some(12));
        assert!(!verified.is_in_flight());

        let requested = DecryptState::VerificationRequested {
            trade_id: "trade-9".to_string(),
        };
        assert!(requested.is_in_flight());
        assert_eq!(requested.revealed_value(), None);
        assert_eq!(DecryptState::Idle.trade_id(), None);
    }
}
