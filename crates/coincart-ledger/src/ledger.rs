//! Reward Ledger Engine
//!
//! The single authority for mutating a user's balance and appending the
//! transaction record. Each `(user, source_action_id)` pair moves through a
//! one-way state machine, `unseen -> committed`, on the first accepted
//! credit; every later presentation of the same key resolves to a duplicate
//! outcome without touching the balance.
//!
//! The engine is generic over the store and clock effect traits and holds no
//! ledger state of its own: uniqueness and balance constraints live in the
//! store commit, so two logically concurrent calls for one key race at the
//! store and exactly one wins, whatever the interleaving.

use crate::config::LedgerConfig;
use coincart_core::effects::{InsertOutcome, StoreError};
use coincart_core::{
    ActionDescriptor, ClockEffects, HistoryFilter, LedgerError, LedgerResult, SourceActionId,
    StoreEffects, Transaction, TransactionKind, UserId,
};
use serde::{Deserialize, Serialize};
use std::future::Future;
use tracing::{debug, warn};

/// Result of a credit attempt. Duplicate is a success, not an error: the
/// caller may use it to show "already rewarded" messaging.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum CreditOutcome {
    /// First acceptance of this action key; the balance was incremented
    Credited {
        /// The freshly committed transaction
        transaction: Transaction,
        /// Balance after the credit
        balance: u64,
    },
    /// The action key was already committed; nothing changed
    Duplicate {
        /// The transaction committed by the earlier acceptance
        transaction: Transaction,
        /// Current balance, unmodified by this call
        balance: u64,
    },
}

impl CreditOutcome {
    /// Whether this call was collapsed into an earlier commit
    pub fn is_duplicate(&self) -> bool {
        matches!(self, CreditOutcome::Duplicate { .. })
    }

    /// The transaction this outcome refers to
    pub fn transaction(&self) -> &Transaction {
        match self {
            CreditOutcome::Credited { transaction, .. } => transaction,
            CreditOutcome::Duplicate { transaction, .. } => transaction,
        }
    }

    /// Balance observed by this call
    pub fn balance(&self) -> u64 {
        match self {
            CreditOutcome::Credited { balance, .. } => *balance,
            CreditOutcome::Duplicate { balance, .. } => *balance,
        }
    }
}

/// Result of a debit attempt
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum DebitOutcome {
    /// The deduction was committed
    Debited {
        /// The freshly committed transaction
        transaction: Transaction,
        /// Balance after the deduction
        balance: u64,
    },
    /// The supplied idempotency key was already committed; no second
    /// deduction was applied
    Duplicate {
        /// The transaction committed by the earlier attempt
        transaction: Transaction,
        /// Current balance, unmodified by this call
        balance: u64,
    },
}

impl DebitOutcome {
    /// Whether this call was collapsed into an earlier commit
    pub fn is_duplicate(&self) -> bool {
        matches!(self, DebitOutcome::Duplicate { .. })
    }

    /// Balance observed by this call
    pub fn balance(&self) -> u64 {
        match self {
            DebitOutcome::Debited { balance, .. } => *balance,
            DebitOutcome::Duplicate { balance, .. } => *balance,
        }
    }
}

/// The ledger engine
#[derive(Debug, Clone)]
pub struct RewardLedger<S, C> {
    store: S,
    clock: C,
    config: LedgerConfig,
}

impl<S, C> RewardLedger<S, C>
where
    S: StoreEffects,
    C: ClockEffects,
{
    /// Create a ledger over `store` and `clock` with default config
    pub fn new(store: S, clock: C) -> Self {
        Self::with_config(store, clock, LedgerConfig::default())
    }

    /// Create a ledger with explicit config
    pub fn with_config(store: S, clock: C, config: LedgerConfig) -> Self {
        Self {
            store,
            clock,
            config,
        }
    }

    /// Credit `user_id` for one reward-eligible action.
    ///
    /// Safe to call any number of times with the same descriptor: the first
    /// accepted call commits, every later one returns
    /// [`CreditOutcome::Duplicate`] with the original transaction and an
    /// unchanged balance.
    pub async fn credit_for_action(
        &self,
        user_id: UserId,
        descriptor: ActionDescriptor,
    ) -> LedgerResult<CreditOutcome> {
        descriptor.validate()?;

        let now = self.clock.now().await;
        let transaction = Transaction::new(
            user_id,
            TransactionKind::Earned,
            descriptor.reward_amount,
            descriptor.description,
            descriptor.source_action_id,
            now,
        );
        let requested = transaction.amount;
        let key = transaction.source_action_id.clone();

        match self.commit(transaction, requested).await? {
            InsertOutcome::Inserted {
                transaction,
                balance,
            } => {
                debug!(user = %user_id, %key, amount = requested, balance, "credit committed");
                Ok(CreditOutcome::Credited {
                    transaction,
                    balance,
                })
            }
            InsertOutcome::Existing {
                transaction,
                balance,
            } => {
                debug!(user = %user_id, %key, "credit collapsed into earlier commit");
                Ok(CreditOutcome::Duplicate {
                    transaction,
                    balance,
                })
            }
        }
    }

    /// Deduct `amount` coins from `user_id`.
    ///
    /// Fails with [`LedgerError::InsufficientBalance`] when `amount` exceeds
    /// the balance; the check and the deduction are one store commit, so the
    /// balance can never be observed negative. When `idempotency_key` is
    /// supplied (e.g. an order id) a repeated key is a duplicate no-op, same
    /// rule as credit; without a key, every call deducts.
    pub async fn debit(
        &self,
        user_id: UserId,
        amount: u64,
        description: impl Into<String>,
        idempotency_key: Option<SourceActionId>,
    ) -> LedgerResult<DebitOutcome> {
        if amount == 0 {
            return Err(LedgerError::invalid_action("debit amount must be positive"));
        }
        if let Some(key) = &idempotency_key {
            if key.is_empty() {
                return Err(LedgerError::invalid_action("empty debit idempotency key"));
            }
        }
        let key = idempotency_key
            .unwrap_or_else(|| SourceActionId::new(format!("debit:{}", uuid::Uuid::new_v4())));

        let now = self.clock.now().await;
        let transaction = Transaction::new(
            user_id,
            TransactionKind::Spent,
            amount,
            description,
            key.clone(),
            now,
        );

        match self.commit(transaction, amount).await? {
            InsertOutcome::Inserted {
                transaction,
                balance,
            } => {
                debug!(user = %user_id, %key, amount, balance, "debit committed");
                Ok(DebitOutcome::Debited {
                    transaction,
                    balance,
                })
            }
            InsertOutcome::Existing {
                transaction,
                balance,
            } => {
                debug!(user = %user_id, %key, "debit collapsed into earlier commit");
                Ok(DebitOutcome::Duplicate {
                    transaction,
                    balance,
                })
            }
        }
    }

    /// Point-in-time snapshot of the user's transactions, newest first
    /// (ties broken by transaction id ascending), optionally filtered by
    /// kind and truncated. An unseen user yields an empty list.
    pub async fn history(
        &self,
        user_id: UserId,
        filter: HistoryFilter,
    ) -> LedgerResult<Vec<Transaction>> {
        let mut transactions = self
            .bounded(self.store.list_transactions(user_id), 0)
            .await?;
        transactions.retain(|transaction| filter.matches(transaction));
        transactions.sort_by_key(Transaction::history_key);
        if let Some(limit) = filter.limit {
            transactions.truncate(limit);
        }
        Ok(transactions)
    }

    /// Current authoritative balance; 0 for a user the ledger has never
    /// seen, without materializing an account.
    pub async fn balance_of(&self, user_id: UserId) -> LedgerResult<u64> {
        self.bounded(self.store.get_balance(user_id), 0).await
    }

    /// One atomic store commit, bounded by the configured timeout.
    async fn commit(&self, transaction: Transaction, requested: u64) -> LedgerResult<InsertOutcome> {
        self.bounded(self.store.insert_transaction_if_absent(transaction), requested)
            .await
    }

    /// Bound a store call by `store_timeout`, mapping expiry and transport
    /// failure to `StoreUnavailable` and the store's balance constraint to
    /// `InsufficientBalance`.
    async fn bounded<T>(
        &self,
        call: impl Future<Output = Result<T, StoreError>>,
        requested: u64,
    ) -> LedgerResult<T> {
        let result = match tokio::time::timeout(self.config.store_timeout, call).await {
            Ok(result) => result,
            Err(_) => {
                let timeout_ms = self.config.store_timeout.as_millis();
                warn!(timeout_ms, "store call timed out");
                return Err(LedgerError::store_unavailable(format!(
                    "store call timed out after {timeout_ms}ms"
                )));
            }
        };
        result.map_err(|err| match err {
            StoreError::Unavailable { reason } => {
                warn!(%reason, "store call failed");
                LedgerError::StoreUnavailable { reason }
            }
            StoreError::BalanceConstraint { available } => LedgerError::InsufficientBalance {
                requested,
                available,
            },
        })
    }
}
