//! Runtime configuration resolution.
//!
//! # Responsibility
//! - Resolve database path and logging settings from the environment.
//! - Apply caller overrides (CLI flags) on top of environment values.
//!
//! # Invariants
//! - Blank environment values are treated as unset.
//! - The resolved log level is always one `init_logging` accepts.

use crate::logging::{default_log_level, normalize_level};
use std::collections::HashMap;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::PathBuf;

pub const DB_PATH_ENV: &str = "SCRUMBOARD_DB_PATH";
pub const LOG_LEVEL_ENV: &str = "SCRUMBOARD_LOG_LEVEL";
pub const LOG_DIR_ENV: &str = "SCRUMBOARD_LOG_DIR";
const DEFAULT_DB_FILE_NAME: &str = "scrumboard.sqlite3";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    InvalidLogLevel(String),
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidLogLevel(message) => write!(f, "{message}"),
        }
    }
}

impl Error for ConfigError {}

/// Explicit settings that take precedence over the environment.
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub db_path: Option<PathBuf>,
    pub log_level: Option<String>,
    pub log_dir: Option<PathBuf>,
}

/// Resolved board settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoardConfig {
    pub db_path: PathBuf,
    pub log_level: &'static str,
    /// File logging is disabled when `None`.
    pub log_dir: Option<PathBuf>,
}

impl BoardConfig {
    /// Resolves settings from the process environment plus `overrides`.
    pub fn resolve(overrides: ConfigOverrides) -> Result<Self, ConfigError> {
        let env: HashMap<String, String> = std::env::vars().collect();
        Self::resolve_from(&env, overrides)
    }

    /// Resolves settings from an explicit variable map plus `overrides`.
    pub fn resolve_from(
        env: &HashMap<String, String>,
        overrides: ConfigOverrides,
    ) -> Result<Self, ConfigError> {
        let db_path = overrides
            .db_path
            .or_else(|| non_blank(env, DB_PATH_ENV).map(PathBuf::from))
            .unwrap_or_else(|| std::env::temp_dir().join(DEFAULT_DB_FILE_NAME));

        let log_level = match overrides
            .log_level
            .or_else(|| non_blank(env, LOG_LEVEL_ENV).map(str::to_string))
        {
            Some(raw) => normalize_level(&raw).map_err(ConfigError::InvalidLogLevel)?,
            None => default_log_level(),
        };

        let log_dir = overrides
            .log_dir
            .or_else(|| non_blank(env, LOG_DIR_ENV).map(PathBuf::from));

        Ok(Self {
            db_path,
            log_level,
            log_dir,
        })
    }
}

fn non_blank<'a>(env: &'a HashMap<String, String>, key: &str) -> Option<&'a str> {
    env.get(key)
        .map(|value| value.trim())
        .filter(|value| !value.is_empty())
}
