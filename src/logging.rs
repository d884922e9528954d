//! Tracing setup.
//!
//! The alternate screen belongs to the UI, so events are written to a log
//! file instead of stderr.

use std::fs::OpenOptions;
use std::path::Path;
use std::sync::Mutex;

use anyhow::{Context, Result};
use tracing_subscriber::EnvFilter;

/// Build the filter: `RUST_LOG` if set, otherwise `level` for this crate
/// with noisy HTTP internals held at `warn`.
fn filter(level: &str) -> EnvFilter {
    let default = format!("{level},clinic_feed={level},hyper=warn,reqwest=warn");
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default))
}

pub fn init(level: &str, file: &Path) -> Result<()> {
    let log = OpenOptions::new()
        .create(true)
        .append(true)
        .open(file)
        .with_context(|| format!("failed to open log file {}", file.display()))?;

    tracing_subscriber::fmt()
        .with_env_filter(filter(level))
        .with_writer(Mutex::new(log))
        .with_ansi(false)
        .with_target(true)
        .with_level(true)
        .with_thread_names(true)
        .try_init()
        .map_err(|e| anyhow::anyhow!("failed to install tracing subscriber: {e}"))?;

    Ok(())
}
