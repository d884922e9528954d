//! TOML configuration.
//!
//! Every field has a default, so the client runs with no file at all
//! against a local API.  Command-line flags override individual values
//! after the file is read (see `main.rs`).

use std::num::NonZeroU32;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use serde::Deserialize;

/// Looked up in the working directory when no `--config` is given.
pub const DEFAULT_CONFIG_FILE: &str = "clinic-feed.toml";

const DEFAULT_PAGE_SIZE: NonZeroU32 = match NonZeroU32::new(10) {
    Some(n) => n,
    None => unreachable!(),
};

#[derive(Debug, Deserialize, Clone, Default)]
#[serde(default)]
pub struct Config {
    pub api: ApiConfig,
    pub feed: FeedConfig,
    pub clinic: ClinicConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct ApiConfig {
    pub base_url: String,
    pub articles_resource: String,
    pub services_resource: String,
    pub timeout_secs: u64,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:3000/api/v1".to_string(),
            articles_resource: "articles".to_string(),
            services_resource: "services".to_string(),
            timeout_secs: 15,
        }
    }
}

impl ApiConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct FeedConfig {
    /// Records per page; zero is rejected at parse time.
    pub page_size: NonZeroU32,
    /// Quiet period before a burst of end-of-list signals turns into a fetch.
    pub debounce_ms: u64,
    /// Remaining rows below the selection that count as "near the end".
    pub prefetch_threshold: usize,
}

impl Default for FeedConfig {
    fn default() -> Self {
        Self {
            page_size: DEFAULT_PAGE_SIZE,
            debounce_ms: 500,
            prefetch_threshold: 3,
        }
    }
}

impl FeedConfig {
    pub fn debounce_window(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }
}

/// Static practice details shown on the Contact tab.
#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct ClinicConfig {
    pub name: String,
    pub address: String,
    pub phone: String,
    pub appointment_url: String,
    pub about: String,
    pub mission: String,
    pub hours: Vec<String>,
}

impl Default for ClinicConfig {
    fn default() -> Self {
        Self {
            name: "American Family Care, Hollywood, FL".to_string(),
            address: "5812 Hollywood Blvd, Hollywood, FL 33021".to_string(),
            phone: "+1 (954) 866-7435".to_string(),
            appointment_url: "https://www.clockwisemd.com/hospitals/5482/visits/new".to_string(),
            about: "Urgent care for illnesses and injuries that are not life-threatening, \
                    for patients of all ages in the Hollywood area."
                .to_string(),
            mission: "To provide the best healthcare possible in a kind and caring environment, \
                      in an economical manner, while respecting the rights of all of our patients, \
                      at times and locations convenient to the patient."
                .to_string(),
            hours: vec![
                "Monday - Friday: 8:00 AM - 8:00 PM".to_string(),
                "Saturday - Sunday: 8:00 AM - 5:00 PM".to_string(),
            ],
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct LoggingConfig {
    /// Default filter level; `RUST_LOG` takes precedence.
    pub level: String,
    /// Log destination.  The terminal belongs to the UI, so logs go to a file.
    pub file: PathBuf,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            file: PathBuf::from("clinic-feed.log"),
        }
    }
}

impl Config {
    /// Parse a configuration document.
    pub fn parse(text: &str) -> Result<Self> {
        toml::from_str(text).context("invalid configuration")
    }

    /// Load from `path`, or from [`DEFAULT_CONFIG_FILE`] if it exists, or
    /// fall back to built-in defaults.
    ///
    /// An explicitly named file that cannot be read is an error; a missing
    /// default file is not.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let path = match path {
            Some(p) => p.to_path_buf(),
            None => {
                let default = PathBuf::from(DEFAULT_CONFIG_FILE);
                if !default.exists() {
                    return Ok(Self::default());
                }
                default
            }
        };

        let text = std::fs::read_to_string(&path)
            .with_context(|| format!("failed to read config file {}", path.display()))?;
        Self::parse(&text).with_context(|| format!("in {}", path.display()))
    }
}
