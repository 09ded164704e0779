//! Garden database
//!
//! The store that gardens are planted in. Implementations must make
//! [`GardenDatabase::add_garden_entry`] idempotent on the entry id: watering
//! sessions reuse their id when a persist is retried.

use std::fmt::Debug;

use async_trait::async_trait;
use thiserror::Error;

use crate::garden::{EntryId, GardenEntry, OwnerId};

pub mod memory;

pub use self::memory::MemoryGardenDatabase;

/// Database Error
#[derive(Debug, Error)]
pub enum Error {
    /// Database Error
    #[error(transparent)]
    Database(Box<dyn std::error::Error + Send + Sync>),
    /// Serde Error
    #[error(transparent)]
    Serde(#[from] serde_json::Error),
}

/// Garden Database trait
#[async_trait]
pub trait GardenDatabase<Err>: Debug
where
    Err: Into<Error> + From<Error>,
{
    /// Plant an entry.
    ///
    /// Returns `false` without writing when an entry with the same id exists.
    async fn add_garden_entry(&self, entry: GardenEntry) -> Result<bool, Err>;

    /// Get an entry by id
    async fn get_garden_entry(&self, entry_id: &EntryId) -> Result<Option<GardenEntry>, Err>;

    /// All entries of an owner, ordered by `received_at` then id
    async fn list_garden_entries(&self, owner: &OwnerId) -> Result<Vec<GardenEntry>, Err>;

    /// Record that the stored gift `source` was watered into `entry`
    async fn mark_reference_consumed(&self, source: &EntryId, entry: &EntryId)
        -> Result<(), Err>;

    /// Entry the stored gift `source` was watered into, if any
    async fn reference_consumed_by(&self, source: &EntryId) -> Result<Option<EntryId>, Err>;
}
