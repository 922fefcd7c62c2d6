// config.rs - Harness configuration
//
// Values come from the environment (a `.env` file is honoured through
// dotenv) or are set directly in code. Tests usually build a config with
// `HarnessConfig::for_dir` pointing at a temporary directory.

use std::env;
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::timing::minutes;

pub const ENV_SNAPSHOT_DIR: &str = "SQL_MOVIES_SNAPSHOT_DIR";
pub const ENV_SNAPSHOT_EXTENSION: &str = "SQL_MOVIES_SNAPSHOT_EXTENSION";
pub const ENV_CLEANUP: &str = "SQL_MOVIES_CLEANUP";
pub const ENV_SETUP_TIMEOUT: &str = "SQL_MOVIES_SETUP_TIMEOUT_SECS";
pub const ENV_QUERY_TIMEOUT: &str = "SQL_MOVIES_QUERY_TIMEOUT_SECS";

/// What happens to a working copy once its handle is closed
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CleanupPolicy {
    /// Leave the file on disk for inspection
    #[default]
    Keep,
    /// Remove the file (and its SQLite sidecars)
    Delete,
}

impl FromStr for CleanupPolicy {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "keep" => Ok(CleanupPolicy::Keep),
            "delete" => Ok(CleanupPolicy::Delete),
            other => Err(Error::Config {
                key: ENV_CLEANUP,
                reason: format!("expected `keep` or `delete`, got `{other}`"),
            }),
        }
    }
}

impl fmt::Display for CleanupPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CleanupPolicy::Keep => write!(f, "keep"),
            CleanupPolicy::Delete => write!(f, "delete"),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HarnessConfig {
    /// Directory holding `<label>.<extension>` snapshot files and working copies
    pub snapshot_dir: PathBuf,
    pub extension: String,
    pub cleanup: CleanupPolicy,
    /// Ceiling for copy + open
    pub setup_timeout: Duration,
    /// Ceiling for a single query
    pub query_timeout: Duration,
}

impl Default for HarnessConfig {
    fn default() -> Self {
        Self {
            snapshot_dir: PathBuf::from("snapshots"),
            extension: "snapshot".to_string(),
            cleanup: CleanupPolicy::Keep,
            setup_timeout: minutes(3),
            query_timeout: minutes(3),
        }
    }
}

impl HarnessConfig {
    /// Default settings rooted at `dir`
    pub fn for_dir(dir: impl AsRef<Path>) -> Self {
        Self {
            snapshot_dir: dir.as_ref().to_path_buf(),
            ..Self::default()
        }
    }

    pub fn with_cleanup(mut self, cleanup: CleanupPolicy) -> Self {
        self.cleanup = cleanup;
        self
    }

    pub fn with_timeouts(mut self, setup: Duration, query: Duration) -> Self {
        self.setup_timeout = setup;
        self.query_timeout = query;
        self
    }

    /// Read the configuration from the process environment
    pub fn from_env() -> Result<Self> {
        dotenv::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build a configuration from an arbitrary key lookup; unset keys keep
    /// their defaults
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(dir) = lookup(ENV_SNAPSHOT_DIR) {
            config.snapshot_dir = PathBuf::from(dir);
        }
        if let Some(extension) = lookup(ENV_SNAPSHOT_EXTENSION) {
            let extension = extension.trim_start_matches('.').to_string();
            if extension.is_empty() {
                return Err(Error::Config {
                    key: ENV_SNAPSHOT_EXTENSION,
                    reason: "extension must not be empty".to_string(),
                });
            }
            config.extension = extension;
        }
        if let Some(cleanup) = lookup(ENV_CLEANUP) {
            config.cleanup = cleanup.parse()?;
        }
        if let Some(secs) = lookup(ENV_SETUP_TIMEOUT) {
            config.setup_timeout = parse_secs(ENV_SETUP_TIMEOUT, &secs)?;
        }
        if let Some(secs) = lookup(ENV_QUERY_TIMEOUT) {
            config.query_timeout = parse_secs(ENV_QUERY_TIMEOUT, &secs)?;
        }

        Ok(config)
    }
}

fn parse_secs(key: &'static str, value: &str) -> Result<Duration> {
    match value.trim().parse::<u64>() {
        Ok(0) => Err(Error::Config {
            key,
            reason: "timeout must be at least one second".to_string(),
        }),
        Ok(secs) => Ok(Duration::from_secs(secs)),
        Err(e) => Err(Error::Config {
            key,
            reason: format!("`{value}` is not a number of seconds ({e})"),
        }),
    }
}
