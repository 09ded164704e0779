//! Garden
//!
//! A garden is the collection of bloomed gifts one owner has received.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::gift::GiftDescriptor;

pub mod layout;

pub use self::layout::{GardenLayout, Tile};

/// Garden entry identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EntryId(Uuid);

impl EntryId {
    /// Generate a new random [`EntryId`]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Inner uuid
    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for EntryId {
    fn default() -> Self {
        Self::new()
    }
}

impl From<Uuid> for EntryId {
    fn from(id: Uuid) -> Self {
        Self(id)
    }
}

impl FromStr for EntryId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(Uuid::parse_str(s)?))
    }
}

impl fmt::Display for EntryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

/// Opaque owner identifier supplied by the identity provider
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OwnerId(String);

impl OwnerId {
    /// Create a new [`OwnerId`]
    pub fn new<S>(id: S) -> Self
    where
        S: Into<String>,
    {
        Self(id.into())
    }

    /// Owner id as str
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for OwnerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A bloomed gift planted in an owner's garden
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GardenEntry {
    /// Entry id, equal to the id of the watering session that produced it
    pub id: EntryId,
    /// Garden owner
    pub owner: OwnerId,
    /// The gift
    pub descriptor: GiftDescriptor,
    /// Stored entry the gift was opened from, if any
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<EntryId>,
    /// Unix time the flower bloomed
    pub received_at: u64,
}

impl GardenEntry {
    /// Order entries the way gardens are listed
    pub fn sort(entries: &mut [GardenEntry]) {
        entries.sort_by(|a, b| {
            a.received_at
                .cmp(&b.received_at)
                .then_with(|| a.id.cmp(&b.id))
        });
    }
}
