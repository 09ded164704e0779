//! Contexts backed by in-process stores, no network

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Result;
use bloom::database::MemoryGardenDatabase;
use bloom::{GiftContext, GiftContextBuilder, OwnerId, StaticIdentity};
use bloom_redb::GardenRedbDatabase;
use tracing_subscriber::EnvFilter;
use url::Url;

/// Install a test subscriber once; later calls are no-ops
pub fn setup_tracing() {
    let default_filter = "debug";
    let redb_filter = "redb=warn";

    let env_filter = EnvFilter::new(format!("{default_filter},{redb_filter}"));

    // Ok if already set by another test
    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_test_writer()
        .try_init();
}

/// Gift page every test link points at
pub fn gift_page() -> Url {
    let builder = Url::parse("https://gifts.example.org/Flower_gift/index.html").expect("valid url");
    bloom::gift::gift_page(&builder)
}

/// Context on an in-memory store with its identity handle
pub fn create_memory_context(
    owner: Option<&str>,
) -> Result<(GiftContext, Arc<MemoryGardenDatabase>, Arc<StaticIdentity>)> {
    let localstore = Arc::new(MemoryGardenDatabase::new());
    let identity = Arc::new(match owner {
        Some(owner) => StaticIdentity::new(OwnerId::new(owner)),
        None => StaticIdentity::pending(),
    });

    let ctx = GiftContextBuilder::new()
        .localstore(localstore.clone())
        .identity(identity.clone())
        .build()?;

    Ok((ctx, localstore, identity))
}

/// Redb file removed when dropped
pub struct TempGarden {
    /// Database file
    pub path: PathBuf,
}

impl TempGarden {
    /// New unique path in the temp dir
    pub fn new() -> Self {
        Self {
            path: std::env::temp_dir().join(format!("bloom-it-{}.redb", uuid::Uuid::new_v4())),
        }
    }
}

impl Default for TempGarden {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for TempGarden {
    fn drop(&mut self) {
        let _ = std::fs::remove_file(&self.path);
    }
}

/// Context on a redb store at `garden`
pub fn create_redb_context(garden: &TempGarden, owner: &str) -> Result<GiftContext> {
    let localstore = Arc::new(GardenRedbDatabase::new(&garden.path)?);

    Ok(GiftContextBuilder::new()
        .localstore(localstore)
        .identity(Arc::new(StaticIdentity::new(OwnerId::new(owner))))
        .build()?)
}
