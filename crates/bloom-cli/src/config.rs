//! CLI settings
//!
//! Read from an optional TOML file, then overridden by `BLOOM_*` environment
//! variables (`BLOOM_INFO__BUILDER_URL`, `BLOOM_IDENTITY__OWNER_ID`, ...).

use std::path::{Path, PathBuf};

use anyhow::Result;
use config::{Config, Environment, File};
use serde::Deserialize;

/// Builder page used when none is configured
pub const DEFAULT_BUILDER_URL: &str = "https://bloom.example/index.html";

/// Music attached to links built without one
pub const DEFAULT_MUSIC_URL: &str = "https://tonejs.github.io/examples/audio/casio/A2.mp3";

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Info {
    /// Page the builder is served from; links point at `gift.html` next to it
    pub builder_url: String,
    /// Music attached to new links unless `--music` is given
    pub default_music: Option<String>,
    /// Seconds to wait for the garden store
    pub persist_timeout_secs: u64,
}

impl Default for Info {
    fn default() -> Self {
        Self {
            builder_url: DEFAULT_BUILDER_URL.to_string(),
            default_music: Some(DEFAULT_MUSIC_URL.to_string()),
            persist_timeout_secs: 10,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Database {
    /// Garden database file, `<work_dir>/garden.redb` when unset
    pub path: Option<PathBuf>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Identity {
    /// Garden owner; an anonymous id is created when unset
    pub owner_id: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub info: Info,
    pub database: Database,
    pub identity: Identity,
}

impl Settings {
    pub fn new(config_file: Option<&Path>) -> Result<Self> {
        let mut builder = Config::builder();

        if let Some(config_file) = config_file {
            builder = builder.add_source(File::from(config_file).required(true));
        }

        let settings: Settings = builder
            .add_source(
                Environment::with_prefix("BLOOM")
                    .prefix_separator("_")
                    .separator("__"),
            )
            .build()?
            .try_deserialize()?;

        Ok(settings)
    }
}
