//! Identity provider handlers

use async_trait::async_trait;
use coincart_core::effects::IdentityEffects;
use coincart_core::UserId;
use std::sync::Arc;
use tokio::sync::RwLock;

/// Identity handler holding an explicit signed-in state.
///
/// Stands in for the application's auth context: the host signs a user in
/// or out, and the ledger facade only ever reads the current state.
#[derive(Debug, Clone, Default)]
pub struct FixedIdentityHandler {
    current: Arc<RwLock<Option<UserId>>>,
}

impl FixedIdentityHandler {
    /// Create a handler with nobody signed in
    pub fn signed_out() -> Self {
        Self::default()
    }

    /// Create a handler with `user_id` signed in
    pub fn signed_in(user_id: UserId) -> Self {
        Self {
            current: Arc::new(RwLock::new(Some(user_id))),
        }
    }

    /// Sign a user in, replacing any previous session
    pub async fn sign_in(&self, user_id: UserId) {
        let mut current = self.current.write().await;
        *current = Some(user_id);
    }

    /// Sign the current user out
    pub async fn sign_out(&self) {
        let mut current = self.current.write().await;
        *current = None;
    }
}

#[async_trait]
impl IdentityEffects for FixedIdentityHandler {
    async fn current_user_id(&self) -> Option<UserId> {
        *self.current.read().await
    }
}
