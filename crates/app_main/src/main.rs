//! FilePanel - single-file inspector and manager
//!
//! Main entry point.

mod app;

use anyhow::Result;
use app_core::AppConfig;
use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "file_panel", version, about = "Inspect and manage a single file")]
struct Cli {
    /// File to manage
    path: PathBuf,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging and panic hook first
    let _log_guard = app_log::init()?;

    let config = AppConfig::load().unwrap_or_else(|e| {
        tracing::warn!("Failed to load configuration, using defaults: {}", e);
        AppConfig::default()
    });

    if let Err(e) = app_log::cleanup_old_logs(config.logging.retention_days) {
        tracing::warn!("Failed to cleanup old logs: {}", e);
    }

    tracing::info!("FilePanel starting...");

    if !cli.path.exists() {
        anyhow::bail!("No such file: {}", cli.path.display());
    }

    app::run(&cli.path, &config)
}
