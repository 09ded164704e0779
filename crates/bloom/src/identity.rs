//! Identity
//!
//! Supplies the owner a bloomed gift is planted for. An anonymous sign-in
//! that has not finished yet reports no owner; persisting then fails with
//! [`crate::Error::IdentityUnavailable`] and can be retried.

use std::fmt::Debug;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::garden::OwnerId;

/// Identity provider
#[async_trait]
pub trait IdentityProvider: Debug + Send + Sync {
    /// Current owner, `None` while sign-in is pending or failed
    async fn owner_id(&self) -> Option<OwnerId>;
}

/// Identity whose owner is set by the caller
#[derive(Debug, Default)]
pub struct StaticIdentity {
    owner: RwLock<Option<OwnerId>>,
}

impl StaticIdentity {
    /// Identity that is already signed in
    pub fn new(owner: OwnerId) -> Self {
        Self {
            owner: RwLock::new(Some(owner)),
        }
    }

    /// Identity that has not signed in yet
    pub fn pending() -> Self {
        Self::default()
    }

    /// Finish signing in
    pub async fn sign_in(&self, owner: OwnerId) {
        tracing::debug!("Signed in as {}", owner);
        *self.owner.write().await = Some(owner);
    }

    /// Forget the owner
    pub async fn sign_out(&self) {
        *self.owner.write().await = None;
    }
}

#[async_trait]
impl IdentityProvider for StaticIdentity {
    async fn owner_id(&self) -> Option<OwnerId> {
        self.owner.read().await.clone()
    }
}
