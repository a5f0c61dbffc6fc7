//! Simulated store handlers for failure-path tests

use async_trait::async_trait;
use coincart_core::effects::{InsertOutcome, StoreEffects, StoreError};
use coincart_core::{Transaction, UserId};
use std::time::Duration;

/// Store handler that fails every call, simulating an outage
#[derive(Debug, Clone, Copy, Default)]
pub struct UnavailableStoreHandler;

impl UnavailableStoreHandler {
    /// Create an always-failing store
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl StoreEffects for UnavailableStoreHandler {
    async fn insert_transaction_if_absent(
        &self,
        _transaction: Transaction,
    ) -> Result<InsertOutcome, StoreError> {
        Err(StoreError::unavailable("simulated outage"))
    }

    async fn get_balance(&self, _user_id: UserId) -> Result<u64, StoreError> {
        Err(StoreError::unavailable("simulated outage"))
    }

    async fn list_transactions(&self, _user_id: UserId) -> Result<Vec<Transaction>, StoreError> {
        Err(StoreError::unavailable("simulated outage"))
    }
}

/// Store handler that delays every call before delegating to an inner store.
///
/// Used to exercise the ledger's timeout bound: set the latency above
/// `LedgerConfig::store_timeout` and every operation reports the store
/// unavailable.
#[derive(Debug, Clone)]
pub struct LatentStoreHandler<S> {
    inner: S,
    latency: Duration,
}

impl<S> LatentStoreHandler<S> {
    /// Wrap `inner`, delaying each call by `latency`
    pub fn new(inner: S, latency: Duration) -> Self {
        Self { inner, latency }
    }
}

#[async_trait]
impl<S: StoreEffects> StoreEffects for LatentStoreHandler<S> {
    async fn insert_transaction_if_absent(
        &self,
        transaction: Transaction,
    ) -> Result<InsertOutcome, StoreError> {
        tokio::time::sleep(self.latency).await;
        self.inner.insert_transaction_if_absent(transaction).await
    }

    async fn get_balance(&self, user_id: UserId) -> Result<u64, StoreError> {
        tokio::time::sleep(self.latency).await;
        self.inner.get_balance(user_id).await
    }

    async fn list_transactions(&self, user_id: UserId) -> Result<Vec<Transaction>, StoreError> {
        tokio::time::sleep(self.latency).await;
        self.inner.list_transactions(user_id).await
    }
}
