//! Clock handlers

use async_trait::async_trait;
use coincart_core::effects::ClockEffects;
use std::sync::Arc;
use time::{Duration, OffsetDateTime};
use tokio::sync::RwLock;

/// Wall-clock handler backed by the system clock
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClockHandler;

impl SystemClockHandler {
    /// Create a system clock handler
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl ClockEffects for SystemClockHandler {
    async fn now(&self) -> OffsetDateTime {
        OffsetDateTime::now_utc()
    }
}

/// Deterministic clock for tests; time moves only when told to
#[derive(Debug, Clone)]
pub struct FixedClockHandler {
    now: Arc<RwLock<OffsetDateTime>>,
}

impl FixedClockHandler {
    /// Create a clock pinned to `now`
    pub fn new(now: OffsetDateTime) -> Self {
        Self {
            now: Arc::new(RwLock::new(now)),
        }
    }

    /// Advance the clock by `delta`
    pub async fn advance(&self, delta: Duration) {
        let mut now = self.now.write().await;
        *now += delta;
    }

    /// Jump the clock to an absolute time, forwards or backwards
    pub async fn set(&self, to: OffsetDateTime) {
        let mut now = self.now.write().await;
        *now = to;
    }
}

#[async_trait]
impl ClockEffects for FixedClockHandler {
    async fn now(&self) -> OffsetDateTime {
        *self.now.read().await
    }
}
