//! Gift context
//!
//! Everything a recipient's page needs to water and plant gifts: the garden
//! store, the identity provider and the persist timeout. The context is owned
//! by the caller and cloned into each [`WateringSession`].

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use tracing::instrument;

use crate::database::{self, GardenDatabase};
use crate::error::Error;
use crate::garden::{EntryId, GardenEntry, OwnerId};
use crate::gift::{GiftDescriptor, GiftReference};
use crate::identity::IdentityProvider;
use crate::watering::WateringSession;

/// Persist timeout used when none is configured
pub const DEFAULT_PERSIST_TIMEOUT: Duration = Duration::from_secs(10);

/// Shared garden store
pub type GardenStore = Arc<dyn GardenDatabase<database::Error> + Send + Sync>;

/// Session-scoped collaborators
#[derive(Clone)]
pub struct GiftContext {
    /// Garden store
    pub localstore: GardenStore,
    /// Identity provider
    pub identity: Arc<dyn IdentityProvider>,
    /// Upper bound on a single store write
    pub persist_timeout: Duration,
}

impl fmt::Debug for GiftContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GiftContext")
            .field("identity", &self.identity)
            .field("persist_timeout", &self.persist_timeout)
            .finish()
    }
}

impl GiftContext {
    /// Start watering a gift
    pub fn start(&self, descriptor: GiftDescriptor) -> WateringSession {
        WateringSession::new(self.clone(), descriptor, None)
    }

    /// Open a reference and start watering the gift it points at.
    ///
    /// Inline links never fail. Stored links fail with
    /// [`Error::EntryNotFound`] when the entry does not exist.
    #[instrument(skip_all)]
    pub async fn open(&self, reference: &str) -> Result<WateringSession, Error> {
        match GiftReference::parse(reference) {
            GiftReference::Inline(descriptor) => Ok(self.start(descriptor)),
            GiftReference::Stored(entry_id) => {
                tracing::debug!("Opening stored gift {}", entry_id);

                let entry = self
                    .localstore
                    .get_garden_entry(&entry_id)
                    .await?
                    .ok_or(Error::EntryNotFound(entry_id))?;

                Ok(WateringSession::new(
                    self.clone(),
                    entry.descriptor,
                    Some(entry_id),
                ))
            }
        }
    }

    /// Garden of the current owner
    #[instrument(skip_all)]
    pub async fn garden(&self) -> Result<Vec<GardenEntry>, Error> {
        let owner = self.owner_id().await?;
        Ok(self.localstore.list_garden_entries(&owner).await?)
    }

    /// Look up a single entry
    pub async fn entry(&self, entry_id: &EntryId) -> Result<GardenEntry, Error> {
        self.localstore
            .get_garden_entry(entry_id)
            .await?
            .ok_or(Error::EntryNotFound(*entry_id))
    }

    pub(crate) async fn owner_id(&self) -> Result<OwnerId, Error> {
        self.identity
            .owner_id()
            .await
            .ok_or(Error::IdentityUnavailable)
    }
}

/// Builder for [`GiftContext`]
#[derive(Default)]
pub struct GiftContextBuilder {
    localstore: Option<GardenStore>,
    identity: Option<Arc<dyn IdentityProvider>>,
    persist_timeout: Option<Duration>,
}

impl GiftContextBuilder {
    /// Create new [`GiftContextBuilder`]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set garden store
    pub fn localstore(mut self, localstore: GardenStore) -> Self {
        self.localstore = Some(localstore);
        self
    }

    /// Set identity provider
    pub fn identity(mut self, identity: Arc<dyn IdentityProvider>) -> Self {
        self.identity = Some(identity);
        self
    }

    /// Set persist timeout
    pub fn persist_timeout(mut self, timeout: Duration) -> Self {
        self.persist_timeout = Some(timeout);
        self
    }

    /// Build [`GiftContext`]
    pub fn build(self) -> Result<GiftContext, Error> {
        let localstore = self
            .localstore
            .ok_or_else(|| Error::Custom("Localstore required".to_string()))?;
        let identity = self
            .identity
            .ok_or_else(|| Error::Custom("Identity provider required".to_string()))?;

        Ok(GiftContext {
            localstore,
            identity,
            persist_timeout: self.persist_timeout.unwrap_or(DEFAULT_PERSIST_TIMEOUT),
        })
    }
}
