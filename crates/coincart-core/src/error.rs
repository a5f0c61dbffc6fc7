//! Ledger error taxonomy
//!
//! Every failure is a typed outcome. A duplicate credit is deliberately NOT
//! represented here: it is a successful no-op, reported through the outcome
//! enums rather than an error.

use serde::{Deserialize, Serialize};

/// Result alias used throughout the ledger crates
pub type LedgerResult<T> = Result<T, LedgerError>;

/// Failures surfaced by ledger operations
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, thiserror::Error)]
pub enum LedgerError {
    /// The durable store was unreachable or timed out. Transient; the
    /// caller may retry, which is safe because credits are idempotent
    /// per source action id.
    #[error("store unavailable: {reason}")]
    StoreUnavailable {
        /// What failed at the store boundary
        reason: String,
    },

    /// A debit exceeded the current balance. Terminal for that attempt;
    /// the balance is unchanged.
    #[error("insufficient balance: requested {requested}, available {available}")]
    InsufficientBalance {
        /// Amount the caller tried to deduct
        requested: u64,
        /// Balance at the time of the attempt
        available: u64,
    },

    /// Malformed action descriptor or debit request. A caller bug: never
    /// retried, surfaced immediately.
    #[error("invalid action: {reason}")]
    InvalidAction {
        /// What made the request malformed
        reason: String,
    },

    /// The identity provider reported no signed-in user. The ledger never
    /// issues credits without one.
    #[error("no authenticated user")]
    NotAuthenticated,
}

impl LedgerError {
    /// Store-unreachable error
    pub fn store_unavailable(reason: impl Into<String>) -> Self {
        Self::StoreUnavailable {
            reason: reason.into(),
        }
    }

    /// Malformed-request error
    pub fn invalid_action(reason: impl Into<String>) -> Self {
        Self::InvalidAction {
            reason: reason.into(),
        }
    }

    /// Whether a retry of the same call can ever succeed
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::StoreUnavailable { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_only_store_unavailable_is_retryable() {
        assert!(LedgerError::store_unavailable("timeout").is_retryable());
        assert!(!LedgerError::invalid_action("empty key").is_retryable());
        assert!(!LedgerError::NotAuthenticated.is_retryable());
        assert!(!LedgerError::InsufficientBalance {
            requested: 150,
            available: 100
        }
        .is_retryable());
    }

    #[test]
    fn test_display_messages() {
        let err = LedgerError::InsufficientBalance {
            requested: 150,
            available: 100,
        };
        assert_eq!(
            err.to_string(),
            "insufficient balance: requested 150, available 100"
        );
    }
}
