//! Effect traits for the ledger's external collaborators
//!
//! The ledger core is pure orchestration; everything that touches the outside
//! world (the durable store, the identity provider, the wall clock) is an
//! effect trait implemented by handler crates.

use crate::identifiers::UserId;
use crate::transaction::Transaction;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

/// Failures at the durable-store boundary
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, thiserror::Error)]
pub enum StoreError {
    /// The store could not be reached or the call failed transiently
    #[error("store unreachable: {reason}")]
    Unavailable {
        /// Transport- or store-level failure description
        reason: String,
    },

    /// The store's non-negative balance constraint rejected the commit
    #[error("balance constraint violated, available {available}")]
    BalanceConstraint {
        /// Balance at the time of the rejected commit
        available: u64,
    },
}

impl StoreError {
    /// Store-unreachable error
    pub fn unavailable(reason: impl Into<String>) -> Self {
        Self::Unavailable {
            reason: reason.into(),
        }
    }
}

/// Result of an insert-if-absent commit
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum InsertOutcome {
    /// The transaction was appended and the balance adjusted in one commit
    Inserted {
        /// The committed transaction
        transaction: Transaction,
        /// Account balance after the commit
        balance: u64,
    },
    /// A transaction with this `(user, source_action_id)` already existed;
    /// nothing was written
    Existing {
        /// The previously committed transaction
        transaction: Transaction,
        /// Current account balance, unmodified by this call
        balance: u64,
    },
}

impl InsertOutcome {
    /// The transaction this outcome refers to, fresh or pre-existing
    pub fn transaction(&self) -> &Transaction {
        match self {
            InsertOutcome::Inserted { transaction, .. } => transaction,
            InsertOutcome::Existing { transaction, .. } => transaction,
        }
    }

    /// Balance observed by this commit attempt
    pub fn balance(&self) -> u64 {
        match self {
            InsertOutcome::Inserted { balance, .. } => *balance,
            InsertOutcome::Existing { balance, .. } => *balance,
        }
    }
}

/// Durable store consumed by the ledger.
///
/// Uniqueness of `(user_id, source_action_id)` is enforced HERE, not by a
/// client-side check-then-act sequence: two concurrent inserts for one key
/// must resolve to exactly one `Inserted` and one `Existing`, however the
/// calls interleave. The transaction append and the balance adjustment are
/// one commit; no reader may observe one without the other.
#[async_trait]
pub trait StoreEffects: Send + Sync {
    /// Atomically append `transaction` unless one with the same
    /// `(user_id, source_action_id)` exists, applying its signed amount to
    /// the account balance in the same commit. A `Spent` transaction that
    /// would drive the balance negative is rejected with
    /// [`StoreError::BalanceConstraint`] and nothing is written.
    async fn insert_transaction_if_absent(
        &self,
        transaction: Transaction,
    ) -> Result<InsertOutcome, StoreError>;

    /// Current balance; 0 for a user the store has never seen
    async fn get_balance(&self, user_id: UserId) -> Result<u64, StoreError>;

    /// All transactions for `user_id`, in no particular order. Ordering is
    /// the ledger's concern; an unseen user yields an empty list.
    async fn list_transactions(&self, user_id: UserId) -> Result<Vec<Transaction>, StoreError>;
}

/// Identity provider consumed by the session facade
#[async_trait]
pub trait IdentityEffects: Send + Sync {
    /// The currently authenticated user, if any
    async fn current_user_id(&self) -> Option<UserId>;
}

/// Wall-clock source for commit timestamps
#[async_trait]
pub trait ClockEffects: Send + Sync {
    /// Current wall-clock time
    async fn now(&self) -> OffsetDateTime;
}
