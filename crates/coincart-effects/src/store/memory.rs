//! In-memory durable store handler
//!
//! Backs the ledger in tests and local development. The uniqueness
//! constraint on `(user, source_action_id)` and the non-negative balance
//! constraint are enforced inside a single write-lock critical section, so
//! a commit is atomic exactly as a unique index plus check constraint would
//! make it in a SQL store.

use async_trait::async_trait;
use coincart_core::effects::{InsertOutcome, StoreEffects, StoreError};
use coincart_core::{Account, SourceActionId, Transaction, TransactionKind, UserId};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

#[derive(Debug)]
struct AccountState {
    account: Account,
    transactions: Vec<Transaction>,
    by_action: HashMap<SourceActionId, usize>,
}

impl AccountState {
    fn new(user_id: UserId) -> Self {
        Self {
            account: Account::new(user_id),
            transactions: Vec::new(),
            by_action: HashMap::new(),
        }
    }
}

/// In-memory store handler
#[derive(Debug, Clone, Default)]
pub struct MemoryStoreHandler {
    accounts: Arc<RwLock<HashMap<UserId, AccountState>>>,
}

impl MemoryStoreHandler {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl StoreEffects for MemoryStoreHandler {
    async fn insert_transaction_if_absent(
        &self,
        mut transaction: Transaction,
    ) -> Result<InsertOutcome, StoreError> {
        let mut accounts = self.accounts.write().await;
        let state = accounts
            .entry(transaction.user_id)
            .or_insert_with(|| AccountState::new(transaction.user_id));

        if let Some(&index) = state.by_action.get(&transaction.source_action_id) {
            return Ok(InsertOutcome::Existing {
                transaction: state.transactions[index].clone(),
                balance: state.account.balance,
            });
        }

        let balance = match transaction.kind {
            TransactionKind::Earned => state.account.balance.saturating_add(transaction.amount),
            TransactionKind::Spent => match state.account.balance.checked_sub(transaction.amount) {
                Some(balance) => balance,
                None => {
                    return Err(StoreError::BalanceConstraint {
                        available: state.account.balance,
                    })
                }
            },
        };

        // Keep created_at non-decreasing per account in log order even if
        // the wall clock steps backwards between commits.
        if let Some(last) = state.transactions.last() {
            if transaction.created_at < last.created_at {
                transaction.created_at = last.created_at;
            }
        }

        state.account.balance = balance;
        state
            .by_action
            .insert(transaction.source_action_id.clone(), state.transactions.len());
        state.transactions.push(transaction.clone());

        Ok(InsertOutcome::Inserted {
            transaction,
            balance,
        })
    }

    async fn get_balance(&self, user_id: UserId) -> Result<u64, StoreError> {
        let accounts = self.accounts.read().await;
        Ok(accounts
            .get(&user_id)
            .map_or(0, |state| state.account.balance))
    }

    async fn list_transactions(&self, user_id: UserId) -> Result<Vec<Transaction>, StoreError> {
        let accounts = self.accounts.read().await;
        Ok(accounts
            .get(&user_id)
            .map(|state| state.transactions.clone())
            .unwrap_or_default())
    }
}
