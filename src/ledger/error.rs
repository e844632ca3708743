//! Error types for the record path.

use thiserror::Error;

use crate::model::UserId;
use crate::store::StoreError;

/// Top-level error returned by [`Ledger::record`](super::Ledger::record).
///
/// Every variant is detected before any store mutation, except `Store`, which
/// means the primary append (or the eligibility lookup) itself failed; a
/// request is never partially applied.
#[derive(Debug, Error)]
pub enum LedgerError {
    #[error("validation failed: {0}")]
    Validation(#[from] ValidationError),

    /// A referrer was supplied but has no prior history in the ledger. The
    /// whole request is rejected; nothing is persisted.
    #[error("referrer '{0}' has no ledger history")]
    IneligibleReferrer(UserId),

    #[error("event store failure: {0}")]
    Store(#[from] StoreError),
}

/// Rejection of a record request before it reaches the store.
#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("user id is required")]
    MissingUser,

    #[error("credits must be non-negative, got {0}")]
    NegativeCredits(i64),

    #[error("user '{0}' cannot refer themselves")]
    SelfReferral(UserId),

    #[error("referral_bonus events cannot be recorded directly")]
    ReservedAction,
}

/// Operating mode governing how much error detail leaves the service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Mode {
    Development,
    #[default]
    Production,
}

impl LedgerError {
    /// Message safe to hand back to an external caller.
    ///
    /// Validation and eligibility failures are caller-facing by construction.
    /// Store failures carry backend detail, which production mode redacts to a
    /// generic message; the full error is still available for logging.
    pub fn caller_message(&self, mode: Mode) -> String {
        match (self, mode) {
            (LedgerError::Store(_), Mode::Production) => {
                "credit event could not be recorded".to_string()
            }
            _ => self.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn production_redacts_store_detail() {
        let err = LedgerError::Store(StoreError::Unavailable("db at 10.0.0.3 timed out".into()));
        let msg = err.caller_message(Mode::Production);
        assert_eq!(msg, "credit event could not be recorded");
        assert!(!msg.contains("10.0.0.3"));
    }

    #[test]
    fn development_keeps_store_detail() {
        let err = LedgerError::Store(StoreError::Unavailable("timeout".into()));
        assert!(err.caller_message(Mode::Development).contains("timeout"));
    }

    #[test]
    fn validation_detail_is_always_caller_safe() {
        let err = LedgerError::Validation(ValidationError::SelfReferral("u1".into()));
        assert!(err.caller_message(Mode::Production).contains("u1"));

        let err = LedgerError::IneligibleReferrer("ghost".into());
        assert!(err.caller_message(Mode::Production).contains("ghost"));
    }
}
