//! Session facade
//!
//! Wraps the ledger with the identity provider so UI call sites operate on
//! "the signed-in user" instead of threading user ids around. Every call
//! resolves the current user first; with nobody signed in, nothing reaches
//! the store.

use crate::ledger::{CreditOutcome, DebitOutcome, RewardLedger};
use coincart_core::{
    ActionDescriptor, ClockEffects, HistoryFilter, IdentityEffects, LedgerError, LedgerResult,
    SourceActionId, StoreEffects, Transaction, UserId,
};

/// Identity-resolving wrapper over [`RewardLedger`]
#[derive(Debug, Clone)]
pub struct SessionLedger<S, C, I> {
    ledger: RewardLedger<S, C>,
    identity: I,
}

impl<S, C, I> SessionLedger<S, C, I>
where
    S: StoreEffects,
    C: ClockEffects,
    I: IdentityEffects,
{
    /// Wrap `ledger` with `identity`
    pub fn new(ledger: RewardLedger<S, C>, identity: I) -> Self {
        Self { ledger, identity }
    }

    /// The wrapped ledger, for callers that already hold a user id
    pub fn ledger(&self) -> &RewardLedger<S, C> {
        &self.ledger
    }

    async fn current_user(&self) -> LedgerResult<UserId> {
        self.identity
            .current_user_id()
            .await
            .ok_or(LedgerError::NotAuthenticated)
    }

    /// Credit the signed-in user for one reward-eligible action
    pub async fn credit_for_action(
        &self,
        descriptor: ActionDescriptor,
    ) -> LedgerResult<CreditOutcome> {
        let user_id = self.current_user().await?;
        self.ledger.credit_for_action(user_id, descriptor).await
    }

    /// Debit the signed-in user
    pub async fn debit(
        &self,
        amount: u64,
        description: impl Into<String>,
        idempotency_key: Option<SourceActionId>,
    ) -> LedgerResult<DebitOutcome> {
        let user_id = self.current_user().await?;
        self.ledger
            .debit(user_id, amount, description, idempotency_key)
            .await
    }

    /// Transaction history of the signed-in user
    pub async fn history(&self, filter: HistoryFilter) -> LedgerResult<Vec<Transaction>> {
        let user_id = self.current_user().await?;
        self.ledger.history(user_id, filter).await
    }

    /// Balance of the signed-in user
    pub async fn balance(&self) -> LedgerResult<u64> {
        let user_id = self.current_user().await?;
        self.ledger.balance_of(user_id).await
    }
}
