//! Redb garden storage

use std::path::Path;
use std::sync::Arc;

use async_trait::async_trait;
use bloom::database::{self, GardenDatabase};
use bloom::garden::{EntryId, GardenEntry, OwnerId};
use redb::{
    Database, MultimapTableDefinition, ReadableMultimapTable, ReadableTable, TableDefinition,
};
use tracing::instrument;

use crate::error::Error;

// <Entry_id, GardenEntry json>
const ENTRIES_TABLE: TableDefinition<&str, &str> = TableDefinition::new("garden_entries");
// <Owner_id, Entry_id>
const OWNER_ENTRIES_TABLE: MultimapTableDefinition<&str, &str> =
    MultimapTableDefinition::new("owner_entries");
// <Source entry_id, Planted entry_id json>
const CONSUMED_TABLE: TableDefinition<&str, &str> = TableDefinition::new("consumed_references");
const CONFIG_TABLE: TableDefinition<&str, u32> = TableDefinition::new("config");

const DATABASE_VERSION: u32 = 0;

/// Garden Redb Database
#[derive(Debug, Clone)]
pub struct GardenRedbDatabase {
    db: Arc<Database>,
}

impl GardenRedbDatabase {
    /// Open or create a garden database at `path`
    pub fn new(path: &Path) -> Result<Self, Error> {
        let db = Database::create(path)?;

        let write_txn = db.begin_write()?;
        {
            let mut table = write_txn.open_table(CONFIG_TABLE)?;
            let db_version = table.get("db_version")?.map(|v| v.value());

            match db_version {
                Some(DATABASE_VERSION) => (),
                Some(unknown) => return Err(Error::UnknownDatabaseVersion(unknown)),
                None => {
                    tracing::info!("Creating garden database at {}", path.display());
                    table.insert("db_version", DATABASE_VERSION)?;
                }
            }

            // Create the remaining tables so readers never see them missing
            let _ = write_txn.open_table(ENTRIES_TABLE)?;
            let _ = write_txn.open_multimap_table(OWNER_ENTRIES_TABLE)?;
            let _ = write_txn.open_table(CONSUMED_TABLE)?;
        }
        write_txn.commit()?;

        Ok(Self { db: Arc::new(db) })
    }
}

#[async_trait]
impl GardenDatabase<database::Error> for GardenRedbDatabase {
    #[instrument(skip_all, fields(entry_id = %entry.id))]
    async fn add_garden_entry(&self, entry: GardenEntry) -> Result<bool, database::Error> {
        let key = entry.id.to_string();

        let write_txn = self.db.begin_write().map_err(Error::from)?;
        let inserted = {
            let mut table = write_txn.open_table(ENTRIES_TABLE).map_err(Error::from)?;

            if table.get(key.as_str()).map_err(Error::from)?.is_some() {
                false
            } else {
                let value = serde_json::to_string(&entry).map_err(Error::from)?;
                table
                    .insert(key.as_str(), value.as_str())
                    .map_err(Error::from)?;

                let mut owners = write_txn
                    .open_multimap_table(OWNER_ENTRIES_TABLE)
                    .map_err(Error::from)?;
                owners
                    .insert(entry.owner.as_str(), key.as_str())
                    .map_err(Error::from)?;

                true
            }
        };
        write_txn.commit().map_err(Error::from)?;

        if !inserted {
            tracing::debug!("Garden entry {} already stored", key);
        }

        Ok(inserted)
    }

    #[instrument(skip(self))]
    async fn get_garden_entry(
        &self,
        entry_id: &EntryId,
    ) -> Result<Option<GardenEntry>, database::Error> {
        let read_txn = self.db.begin_read().map_err(Error::from)?;
        let table = read_txn.open_table(ENTRIES_TABLE).map_err(Error::from)?;

        match table
            .get(entry_id.to_string().as_str())
            .map_err(Error::from)?
        {
            Some(entry) => Ok(Some(
                serde_json::from_str(entry.value()).map_err(Error::from)?,
            )),
            None => Ok(None),
        }
    }

    #[instrument(skip(self))]
    async fn list_garden_entries(
        &self,
        owner: &OwnerId,
    ) -> Result<Vec<GardenEntry>, database::Error> {
        let read_txn = self.db.begin_read().map_err(Error::from)?;
        let owners = read_txn
            .open_multimap_table(OWNER_ENTRIES_TABLE)
            .map_err(Error::from)?;
        let table = read_txn.open_table(ENTRIES_TABLE).map_err(Error::from)?;

        let mut entries = Vec::new();

        for entry_id in owners.get(owner.as_str()).map_err(Error::from)? {
            let entry_id = entry_id.map_err(Error::from)?;

            if let Some(entry) = table.get(entry_id.value()).map_err(Error::from)? {
                let entry: GardenEntry =
                    serde_json::from_str(entry.value()).map_err(Error::from)?;
                entries.push(entry);
            }
        }

        GardenEntry::sort(&mut entries);

        Ok(entries)
    }

    #[instrument(skip(self))]
    async fn mark_reference_consumed(
        &self,
        source: &EntryId,
        entry: &EntryId,
    ) -> Result<(), database::Error> {
        let value = serde_json::to_string(entry).map_err(Error::from)?;

        let write_txn = self.db.begin_write().map_err(Error::from)?;
        {
            let mut table = write_txn.open_table(CONSUMED_TABLE).map_err(Error::from)?;
            table
                .insert(source.to_string().as_str(), value.as_str())
                .map_err(Error::from)?;
        }
        write_txn.commit().map_err(Error::from)?;

        Ok(())
    }

    #[instrument(skip(self))]
    async fn reference_consumed_by(
        &self,
        source: &EntryId,
    ) -> Result<Option<EntryId>, database::Error> {
        let read_txn = self.db.begin_read().map_err(Error::from)?;
        let table = read_txn.open_table(CONSUMED_TABLE).map_err(Error::from)?;

        let consumed_by = table
            .get(source.to_string().as_str())
            .map_err(Error::from)?
            .map(|entry| serde_json::from_str::<EntryId>(entry.value()))
            .transpose()
            .map_err(Error::from)?;

        Ok(consumed_by)
    }
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use bloom::gift::{FlowerKind, GiftDescriptor, Theme};

    use super::*;

    /// Removes the database file when dropped
    struct TempDb(PathBuf);

    impl TempDb {
        fn new() -> Self {
            Self(std::env::temp_dir().join(format!("bloom-redb-{}.redb", uuid::Uuid::new_v4())))
        }
    }

    impl Drop for TempDb {
        fn drop(&mut self) {
            let _ = std::fs::remove_file(&self.0);
        }
    }

    fn entry(owner: &str, received_at: u64) -> GardenEntry {
        GardenEntry {
            id: EntryId::new(),
            owner: OwnerId::new(owner),
            descriptor: GiftDescriptor::new(
                FlowerKind::Sunflower,
                "Get well soon",
                Theme::Summer,
                5,
                Some("https://example.com/tune.mp3".to_string()),
                true,
            ),
            source: None,
            received_at,
        }
    }

    #[tokio::test]
    async fn test_add_and_get_entry() {
        let path = TempDb::new();
        let db = GardenRedbDatabase::new(&path.0).unwrap();
        let entry = entry("alice", 100);

        assert!(db.add_garden_entry(entry.clone()).await.unwrap());
        assert_eq!(
            db.get_garden_entry(&entry.id).await.unwrap(),
            Some(entry.clone())
        );
        assert_eq!(db.get_garden_entry(&EntryId::new()).await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_add_is_idempotent_across_reopen() {
        let path = TempDb::new();
        let entry = entry("alice", 100);

        {
            let db = GardenRedbDatabase::new(&path.0).unwrap();
            assert!(db.add_garden_entry(entry.clone()).await.unwrap());
        }

        let db = GardenRedbDatabase::new(&path.0).unwrap();
        assert!(!db.add_garden_entry(entry.clone()).await.unwrap());

        let garden = db
            .list_garden_entries(&OwnerId::new("alice"))
            .await
            .unwrap();
        assert_eq!(garden, vec![entry]);
    }

    #[tokio::test]
    async fn test_list_garden_entries_by_owner() {
        let path = TempDb::new();
        let db = GardenRedbDatabase::new(&path.0).unwrap();

        let second = entry("alice", 200);
        let first = entry("alice", 100);
        db.add_garden_entry(second.clone()).await.unwrap();
        db.add_garden_entry(entry("bob", 150)).await.unwrap();
        db.add_garden_entry(first.clone()).await.unwrap();

        let garden = db
            .list_garden_entries(&OwnerId::new("alice"))
            .await
            .unwrap();
        assert_eq!(garden, vec![first, second]);

        assert!(db
            .list_garden_entries(&OwnerId::new("nobody"))
            .await
            .unwrap()
            .is_empty());
    }

    #[tokio::test]
    async fn test_consumed_references() {
        let path = TempDb::new();
        let db = GardenRedbDatabase::new(&path.0).unwrap();
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
