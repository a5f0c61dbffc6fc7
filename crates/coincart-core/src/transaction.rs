//! Transaction Log Types
//!
//! A transaction is the immutable record of one balance-affecting commit.
//! The log is append-only per account: no transaction is ever edited or
//! removed by the ledger core.

use crate::identifiers::{SourceActionId, TransactionId, UserId};
use serde::{Deserialize, Serialize};
use std::fmt;
use time::OffsetDateTime;

/// Direction of a balance change
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionKind {
    /// Coins credited for a reward-eligible action
    Earned,
    /// Coins deducted toward a purchase
    Spent,
}

impl TransactionKind {
    /// Signed contribution of a transaction of this kind to the balance
    pub fn signed_amount(&self, amount: u64) -> i128 {
        match self {
            TransactionKind::Earned => i128::from(amount),
            TransactionKind::Spent => -i128::from(amount),
        }
    }
}

impl fmt::Display for TransactionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TransactionKind::Earned => write!(f, "earned"),
            TransactionKind::Spent => write!(f, "spent"),
        }
    }
}

/// One committed balance change
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transaction {
    /// Unique identifier, minted at commit time
    pub transaction_id: TransactionId,

    /// Owning account
    pub user_id: UserId,

    /// Earned or spent
    pub kind: TransactionKind,

    /// Positive magnitude of the change
    pub amount: u64,

    /// Human-readable reason, e.g. "Watched Nike advertisement"
    pub description: String,

    /// Idempotency key of the action that produced this transaction
    pub source_action_id: SourceActionId,

    /// Commit timestamp, non-decreasing per account in log order
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

impl Transaction {
    /// Create a transaction record with a fresh id
    pub fn new(
        user_id: UserId,
        kind: TransactionKind,
        amount: u64,
        description: impl Into<String>,
        source_action_id: SourceActionId,
        created_at: OffsetDateTime,
    ) -> Self {
        Self {
            transaction_id: TransactionId::new(),
            user_id,
            kind,
            amount,
            description: description.into(),
            source_action_id,
            created_at,
        }
    }

    /// Signed contribution of this transaction to the account balance
    pub fn signed_amount(&self) -> i128 {
        self.kind.signed_amount(self.amount)
    }

    /// Sort key for history listings: descending `created_at`, ties broken
    /// by `transaction_id` ascending for determinism.
    pub fn history_key(&self) -> (i128, TransactionId) {
        (-self.created_at.unix_timestamp_nanos(), self.transaction_id)
    }
}

/// Filter applied by history queries
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryFilter {
    /// Restrict to one transaction kind; `None` returns both
    pub kind: Option<TransactionKind>,

    /// Truncate the result after this many entries (most recent first)
    pub limit: Option<usize>,
}

impl HistoryFilter {
    /// Keep every transaction
    pub fn all() -> Self {
        Self::default()
    }

    /// Keep only earned transactions
    pub fn earned() -> Self {
        Self {
            kind: Some(TransactionKind::Earned),
            ..Self::default()
        }
    }

    /// Keep only spent transactions
    pub fn spent() -> Self {
        Self {
            kind: Some(TransactionKind::Spent),
            ..Self::default()
        }
    }

    /// Truncate to the most recent `limit` entries
    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    /// Whether a transaction passes the kind filter
    pub fn matches(&self, transaction: &Transaction) -> bool {
        self.kind.map_or(true, |kind| transaction.kind == kind)
    }
}
