//! Account entity owned by the durable store.

use crate::identifiers::UserId;
use serde::{Deserialize, Serialize};

/// Authoritative coin balance for one user.
///
/// Invariant: `balance` equals the sum of earned amounts minus the sum of
/// spent amounts over the account's committed transactions, and a ledger
/// debit never drives it negative.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Account {
    /// Owning user
    pub user_id: UserId,

    /// Current coin count
    pub balance: u64,
}

impl Account {
    /// Materialize a fresh zero-balance account
    pub fn new(user_id: UserId) -> Self {
        Self {
            user_id,
            balance: 0,
        }
    }
}
