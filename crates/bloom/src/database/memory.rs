//! Memory Database

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;

use super::{Error, GardenDatabase};
use crate::garden::{EntryId, GardenEntry, OwnerId};

/// In-memory garden store
#[derive(Debug, Clone, Default)]
pub struct MemoryGardenDatabase {
    entries: Arc<RwLock<HashMap<EntryId, GardenEntry>>>,
    consumed: Arc<RwLock<HashMap<EntryId, EntryId>>>,
}

impl MemoryGardenDatabase {
    /// Create new [`MemoryGardenDatabase`]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create new [`MemoryGardenDatabase`] already holding `entries`
    pub fn with_entries(entries: Vec<GardenEntry>) -> Self {
        let entries = entries.into_iter().map(|e| (e.id, e)).collect();

        Self {
            entries: Arc::new(RwLock::new(entries)),
            consumed: Arc::default(),
        }
    }

    /// Number of entries across all gardens
    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    /// Whether no entry was planted yet
    pub async fn is_empty(&self) -> bool {
        self.entries.read().await.is_empty()
    }
}

#[async_trait]
impl GardenDatabase<Error> for MemoryGardenDatabase {
    async fn add_garden_entry(&self, entry: GardenEntry) -> Result<bool, Error> {
        let mut entries = self.entries.write().await;

        if entries.contains_key(&entry.id) {
            tracing::debug!("Garden entry {} already planted", entry.id);
            return Ok(false);
        }

        entries.insert(entry.id, entry);
        Ok(true)
    }

    async fn get_garden_entry(&self, entry_id: &EntryId) -> Result<Option<GardenEntry>, Error> {
        Ok(self.entries.read().await.get(entry_id).cloned())
    }

    async fn list_garden_entries(&self, owner: &OwnerId) -> Result<Vec<GardenEntry>, Error> {
        let mut entries: Vec<GardenEntry> = self
            .entries
            .read()
            .await
            .values()
            .filter(|entry| &entry.owner == owner)
            .cloned()
            .collect();

        GardenEntry::sort(&mut entries);
        Ok(entries)
    }

    async fn mark_reference_consumed(
        &self,
        source: &EntryId,
        entry: &EntryId,
    ) -> Result<(), Error> {
        self.consumed.write().await.insert(*source, *entry);
        Ok(())
    }

    async fn reference_consumed_by(&self, source: &EntryId) -> Result<Option<EntryId>, Error> {
        Ok(self.consumed.read().await.get(source).copied())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gift::{FlowerKind, GiftDescriptor, Theme};

    fn entry(owner: &str, received_at: u64) -> GardenEntry {
        GardenEntry {
            id: EntryId::new(),
            owner: OwnerId::new(owner),
            descriptor: GiftDescriptor::new(FlowerKind::Daisy, "hi", Theme::Summer, 2, None, false),
            source: None,
            received_at,
        }
    }

    #[tokio::test]
    async fn test_add_is_idempotent() {
        let db = MemoryGardenDatabase::new();
        let entry = entry("alice", 10);

        assert!(db.add_garden_entry(entry.clone()).await.unwrap());
        assert!(!db.add_garden_entry(entry.clone()).await.unwrap());

        assert_eq!(db.len().await, 1);
        assert_eq!(db.get_garden_entry(&entry.id).await.unwrap(), Some(entry));
    }

    #[tokio::test]
    async fn test_list_only_owner_entries_in_order() {
        let late = entry("alice", 30);
        let early = entry("alice", 10);
        let other = entry("bob", 20);
        let db = MemoryGardenDatabase::with_entries(vec![late.clone(), other, early.clone()]);

        let garden = db
            .list_garden_entries(&OwnerId::new("alice"))
            .await
            .unwrap();

        assert_eq!(garden, vec![early, late]);
        assert!(db
            .list_garden_entries(&OwnerId::new("carol"))
            .await
            .unwrap()
            .is_empty());
    }

    #[tokio::test]
    async fn test_consumed_references() {
        let db = MemoryGardenDatabase::new();
        let source = EntryId::new();
        let planted = EntryId::new();

        assert_eq!(db.reference_consumed_by(&source).await.unwrap(), None);

        db.mark_reference_consumed(&source, &planted).await.unwrap();
        assert_eq!(
            db.reference_consumed_by(&source).await.unwrap(),
            Some(planted)
        );
    }
}
