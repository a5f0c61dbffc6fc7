//! Ledger configuration

use std::time::Duration;

/// Tuning knobs for the ledger engine
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LedgerConfig {
    /// Upper bound on any single durable-store call. On expiry the
    /// operation reports the store unavailable instead of hanging the
    /// calling UI flow.
    pub store_timeout: Duration,
}

impl LedgerConfig {
    /// Config with an explicit store timeout
    pub fn with_store_timeout(store_timeout: Duration) -> Self {
        Self { store_timeout }
    }
}

impl Default for LedgerConfig {
    fn default() -> Self {
        Self {
            store_timeout: Duration::from_secs(10),
        }
    }
}
