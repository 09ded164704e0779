//! Bloom CLI

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{anyhow, Result};
use bloom::{GiftContextBuilder, OwnerId, StaticIdentity};
use bloom_redb::GardenRedbDatabase;
use clap::{Parser, Subcommand};
use tracing::Level;
use tracing_subscriber::EnvFilter;

mod commands;
mod config;
mod identity;

use crate::config::Settings;

const DEFAULT_WORK_DIR: &str = ".bloom";
const CONFIG_FILE: &str = "config.toml";

/// Simple CLI application to send and receive flower gifts
#[derive(Parser)]
#[command(name = "bloom")]
#[command(author = "Bloom Developers")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Send flower gifts and grow your garden", long_about = None)]
struct Cli {
    /// Path to the config file, `<work_dir>/config.toml` when present
    #[arg(short, long, env = "BLOOM_CONFIG")]
    config: Option<PathBuf>,
    /// Path to working dir
    #[arg(short, long)]
    work_dir: Option<PathBuf>,
    /// Garden owner, overrides the configured one
    #[arg(short, long)]
    owner: Option<String>,
    /// Logging level
    #[arg(short, long, default_value = "warn")]
    log_level: Level,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Build a gift link
    Link(commands::link::LinkSubCommand),
    /// Open a gift link and water the flower
    Water(commands::water::WaterSubCommand),
    /// List the flowers in your garden
    Garden(commands::garden::GardenSubCommand),
    /// Show one flower from your garden
    Show(commands::show::ShowSubCommand),
}

#[tokio::main]
async fn main() -> Result<()> {
    let args: Cli = Cli::parse();

    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(args.log_level.as_str().to_lowercase()));
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();

    let work_dir = match &args.work_dir {
        Some(work_dir) => work_dir.clone(),
        None => home::home_dir()
            .ok_or(anyhow!("Unknown home dir"))?
            .join(DEFAULT_WORK_DIR),
    };
    std::fs::create_dir_all(&work_dir)?;

    let config_file = args.config.clone().or_else(|| {
        let default_config = work_dir.join(CONFIG_FILE);
        default_config.exists().then_some(default_config)
    });
    let settings = Settings::new(config_file.as_deref())?;

    if let Commands::Link(sub_command_args) = &args.command {
        return commands::link::link(&settings, sub_command_args);
    }

    let db_path = settings
        .database
        .path
        .clone()
        .unwrap_or_else(|| work_dir.join("garden.redb"));
    tracing::debug!("Using garden database {}", db_path.display());
    let localstore = Arc::new(GardenRedbDatabase::new(&db_path)?);

    let owner = match args.owner.clone().or(settings.identity.owner_id.clone()) {
        Some(owner) => OwnerId::new(owner),
        None => identity::anonymous_owner(&work_dir)?,
    };

    let ctx = GiftContextBuilder::new()
        .localstore(localstore)
        .identity(Arc::new(StaticIdentity::new(owner)))
        .persist_timeout(Duration::from_secs(settings.info.persist_timeout_secs))
        .build()?;

    match &args.command {
        Commands::Link(_) => Ok(()),
        Commands::Water(sub_command_args) => commands::water::water(&ctx, sub_command_args).await,
        Commands::Garden(sub_command_args) => {
            commands::garden::garden(&ctx, sub_command_args).await
        }
        Commands::Show(sub_command_args) => {
            commands::show::show(&ctx, &settings, sub_command_args).await
        }
    }
}
