//! Process-level configuration.
//!
//! # Responsibility
//! - Collect database and logging settings from the environment.
//! - Reject malformed values instead of silently defaulting them.

use crate::logging::{default_log_level, normalize_level};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::PathBuf;

pub const ENV_DB_PATH: &str = "SHOPDOC_DB_PATH";
pub const ENV_LOG_LEVEL: &str = "SHOPDOC_LOG_LEVEL";
pub const ENV_LOG_DIR: &str = "SHOPDOC_LOG_DIR";

const DEFAULT_DB_FILE_NAME: &str = "shopdoc.sqlite3";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// Variable is set but has no usable content.
    Empty(&'static str),
    InvalidLogLevel(String),
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Empty(var) => write!(f, "environment variable `{var}` is set but empty"),
            Self::InvalidLogLevel(message) => write!(f, "{message}"),
        }
    }
}

impl Error for ConfigError {}

/// Settings needed to open the stores and start logging.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CoreConfig {
    pub db_path: PathBuf,
    pub log_level: &'static str,
    /// `None` disables file logging.
    pub log_dir: Option<String>,
}

impl Default for CoreConfig {
    fn default() -> Self {
        Self {
            db_path: PathBuf::from(DEFAULT_DB_FILE_NAME),
            log_level: default_log_level(),
            log_dir: None,
        }
    }
}

impl CoreConfig {
    /// Reads `SHOPDOC_*` variables from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Builds config from an arbitrary variable source.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let mut config = Self::default();

        if let Some(path) = non_empty(&lookup, ENV_DB_PATH)? {
            config.db_path = PathBuf::from(path);
        }
        if let Some(level) = non_empty(&lookup, ENV_LOG_LEVEL)? {
            config.log_level = normalize_level(&level).map_err(ConfigError::InvalidLogLevel)?;
        }
        config.log_dir = non_empty(&lookup, ENV_LOG_DIR)?;

        Ok(config)
    }
}

fn non_empty(
    lookup: &impl Fn(&str) -> Option<String>,
    name: &'static str,
) -> Result<Option<String>, ConfigError> {
    match lookup(name) {
        None => Ok(None),
        Some(value) if value.trim().is_empty() => Err(ConfigError::Empty(name)),
        Some(value) => Ok(Some(value.trim().to_string())),
    }
}
