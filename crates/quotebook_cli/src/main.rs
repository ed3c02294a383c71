//! Quotebook terminal front end.
//!
//! # Responsibility
//! - Load configuration, start logging and open the preference database.
//! - Run one interactive session with periodic background sync.

mod command;
mod config;
mod session;

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use log::warn;
use quotebook_core::db::open_db;
use quotebook_core::{
    init_logging, HttpRemoteSource, MemoryPreferenceRepository, PreferenceRepository, QuoteBook,
    RemoteSource, SqlitePreferenceRepository,
};

use crate::config::QuotebookConfig;
use crate::session::Session;

#[derive(Parser)]
#[command(name = "quotebook", version, about = "Random quotes with category filters and server sync")]
struct Cli {
    /// Path to config file
    #[arg(long, env = "QUOTEBOOK_CONFIG")]
    config: Option<PathBuf>,

    /// Log level (trace|debug|info|warn|error)
    #[arg(long)]
    log_level: Option<String>,

    /// Disable periodic sync for this session
    #[arg(long)]
    no_sync: bool,

    /// Keep the selected category in memory only
    #[arg(long)]
    ephemeral: bool,
}

#[tokio::main]
async fn main() {
    if let Err(err) = run().await {
        eprintln!("quotebook: {err}");
        for cause in err.chain().skip(1) {
            eprintln!("   caused by: {cause}");
        }
        std::process::exit(1);
    }
}

async fn run() -> Result<()> {
    let cli = Cli::parse();
    let config = QuotebookConfig::load(cli.config.as_deref())?;

    let level = cli.log_level.as_deref().unwrap_or(&config.logging.level);
    init_logging(level, &config.logging.dir).context("failed to initialize logging")?;

    println!("quotebook {}", quotebook_core::core_version());

    let settings = config.sync.to_settings();
    let remote: Option<Arc<dyn RemoteSource>> = if config.sync.enabled && !cli.no_sync {
        match HttpRemoteSource::new(&settings) {
            Ok(source) => Some(Arc::new(source)),
            Err(err) => {
                warn!("event=sync_setup module=cli status=error error={err}");
                eprintln!("sync disabled: {err}");
                None
            }
        }
    } else {
        None
    };

    if cli.ephemeral {
        start(MemoryPreferenceRepository::new(), remote, &config).await
    } else {
        let conn = open_db(&config.storage.db_path).with_context(|| {
            format!(
                "failed to open preference store {}",
                config.storage.db_path.display()
            )
        })?;
        start(SqlitePreferenceRepository::new(conn), remote, &config).await
    }
}

async fn start<P: PreferenceRepository>(
    prefs: P,
    remote: Option<Arc<dyn RemoteSource>>,
    config: &QuotebookConfig,
) -> Result<()> {
    let mut book = QuoteBook::new(prefs);
    book.initialize().context("failed to restore session state")?;
    Session::new(
        book,
        remote,
        config.sync.to_settings(),
        config.export.dir.clone(),
    )
    .run()
    .await
}
