//! Log file setup.

use crate::config::CalculatorConfig;
use anyhow::Context;
use std::fs::OpenOptions;
use std::sync::Mutex;
use tracing_subscriber::EnvFilter;

/// Send `tracing` events to `config.log_file()`.
///
/// `RUST_LOG` overrides the default `info` level.
pub fn init(config: &CalculatorConfig) -> anyhow::Result<()> {
    let log_dir = config.log_dir();
    std::fs::create_dir_all(&log_dir)
        .with_context(|| format!("failed to create log directory {}", log_dir.display()))?;

    let log_file = config.log_file();
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&log_file)
        .with_context(|| format!("failed to open log file {}", log_file.display()))?;

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .try_init()
        .map_err(|err| anyhow::anyhow!("failed to initialise logging: {err}"))?;

    tracing::info!(path = %log_file.display(), "Logging initialized");
    Ok(())
}
