//! Service configuration.
//!
//! Defaults, then an optional TOML file, then environment variables, then CLI
//! flags (applied by `main`). `validate` runs last.

use crate::error::{Error, Result};

use serde::Deserialize;
use std::path::Path;
use std::time::Duration;

/// `db_path` value that selects the in-memory store.
pub const IN_MEMORY_DB: &str = ":memory:";

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Config {
    /// trace | debug | info | warn | error
    pub log_level: String,
    /// HTTP listen address.
    pub address: String,
    pub source_url: String,
    pub source_timeout_secs: u64,
    /// Workers per update pipeline stage.
    pub concurrency: usize,
    /// Seconds between index rebuilds.
    pub index_ttl_secs: u64,
    /// Seconds between scheduled updates; `None` disables the scheduler.
    pub update_interval_secs: Option<u64>,
    pub db_path: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            address: "127.0.0.1:8080".to_string(),
            source_url: "https://xkcd.com".to_string(),
            source_timeout_secs: 10,
            concurrency: 10,
            index_ttl_secs: 20,
            update_interval_secs: None,
            db_path: "comics.db".to_string(),
        }
    }
}

impl Config {
    /// Reads `path` if given, then applies environment overrides.
    pub fn load(path: Option<&Path>) -> anyhow::Result<Self> {
        let mut config = match path {
            Some(path) => {
                let raw = std::fs::read_to_string(path)?;
                Self::from_toml(&raw)?
            }
            None => Self::default(),
        };

        config.apply_env(|key| std::env::var(key).ok())?;
        Ok(config)
    }

    pub fn from_toml(raw: &str) -> anyhow::Result<Self> {
        Ok(toml::from_str(raw)?)
    }

    /// Applies overrides from `lookup` (normally the process environment).
    pub fn apply_env(&mut self, lookup: impl Fn(&str) -> Option<String>) -> Result<()> {
        if let Some(value) = lookup("LOG_LEVEL") {
            self.log_level = value;
        }
        if let Some(value) = lookup("SEARCH_ADDRESS") {
            self.address = value;
        }
        if let Some(value) = lookup("XKCD_URL") {
            self.source_url = value;
        }
        if let Some(value) = lookup("XKCD_TIMEOUT") {
            self.source_timeout_secs = parse_env("XKCD_TIMEOUT", &value)?;
        }
        if let Some(value) = lookup("UPDATE_CONCURRENCY") {
            self.concurrency = parse_env("UPDATE_CONCURRENCY", &value)?;
        }
        if let Some(value) = lookup("INDEX_TTL") {
            self.index_ttl_secs = parse_env("INDEX_TTL", &value)?;
        }
        if let Some(value) = lookup("UPDATE_INTERVAL") {
            self.update_interval_secs = Some(parse_env("UPDATE_INTERVAL", &value)?);
        }
        if let Some(value) = lookup("DB_PATH") {
            self.db_path = value;
        }
        Ok(())
    }

    pub fn validate(&self) -> Result<()> {
        if self.concurrency < 1 {
            return Err(Error::InvalidConfig(format!(
                "wrong concurrency specified: {}",
                self.concurrency
            )));
        }
        if self.index_ttl_secs == 0 {
            return Err(Error::InvalidConfig("index TTL must be positive".to_string()));
        }
        if self.update_interval_secs == Some(0) {
            return Err(Error::InvalidConfig(
                "update interval must be positive".to_string(),
            ));
        }
        if self.source_url.trim().is_empty() {
            return Err(Error::InvalidConfig("empty source url".to_string()));
        }
        self.max_level()?;
        Ok(())
    }

    pub fn max_level(&self) -> Result<tracing::Level> {
        self.log_level
            .parse()
            .map_err(|_| Error::InvalidConfig(format!("unknown log level: {}", self.log_level)))
    }

    pub fn index_ttl(&self) -> Duration {
        Duration::from_secs(self.index_ttl_secs)
    }

    pub fn source_timeout(&self) -> Duration {
        Duration::from_secs(self.source_timeout_secs)
    }

    pub fn update_interval(&self) -> Option<Duration> {
        self.update_interval_secs.map(Duration::from_secs)
    }

    pub fn in_memory(&self) -> bool {
        self.db_path == IN_MEMORY_DB
    }
}

fn parse_env<T: std::str::FromStr>(key: &str, value: &str) -> Result<T> {
    value
        .trim()
        .parse()
        .map_err(|_| Error::InvalidConfig(format!("{} has an invalid value: {:?}", key, value)))
}
