//! Server configuration read from environment variables.
//!
//! - `CURRICULUM_DB_PATH`: SQLite database file path (default: "curriculum.db")
//! - `CURRICULUM_BIND_ADDR`: listen address (default: "0.0.0.0:8000")
//! - `CURRICULUM_LOG_LEVEL`: log level (default: build-mode dependent)
//! - `CURRICULUM_LOG_DIR`: absolute log directory (default: stderr)

use std::net::SocketAddr;
use std::path::PathBuf;

pub const DB_PATH_VAR: &str = "CURRICULUM_DB_PATH";
pub const BIND_ADDR_VAR: &str = "CURRICULUM_BIND_ADDR";
pub const LOG_LEVEL_VAR: &str = "CURRICULUM_LOG_LEVEL";
pub const LOG_DIR_VAR: &str = "CURRICULUM_LOG_DIR";

pub const DEFAULT_DB_PATH: &str = "curriculum.db";
pub const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8000";

/// Invalid configuration value.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("{var}=`{value}` is not a socket address: {source}")]
    InvalidBindAddr {
        var: &'static str,
        value: String,
        source: std::net::AddrParseError,
    },
    #[error("{var} must not be empty")]
    Empty { var: &'static str },
}

/// Resolved server settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    pub db_path: PathBuf,
    pub bind_addr: SocketAddr,
    pub log_level: String,
    pub log_dir: Option<String>,
}

impl ServerConfig {
    /// Reads the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    /// Resolves settings through `lookup`, which returns `None` for unset
    /// variables.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let db_path = match lookup(DB_PATH_VAR) {
            Some(value) if value.trim().is_empty() => {
                return Err(ConfigError::Empty { var: DB_PATH_VAR })
            }
            Some(value) => PathBuf::from(value.trim()),
            None => PathBuf::from(DEFAULT_DB_PATH),
        };

        let raw_addr = lookup(BIND_ADDR_VAR).unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string());
        let bind_addr =
            raw_addr
                .trim()
                .parse()
                .map_err(|source| ConfigError::InvalidBindAddr {
                    var: BIND_ADDR_VAR,
                    value: raw_addr.clone(),
                    source,
                })?;

        let log_level = lookup(LOG_LEVEL_VAR)
            .map(|value| value.trim().to_string())
            .filter(|value| !value.is_empty())
            .unwrap_or_else(|| curriculum_core::default_log_level().to_string());

        let log_dir = lookup(LOG_DIR_VAR)
            .map(|value| value.trim().to_string())
            .filter(|value| !value.is_empty());

        Ok(Self {
            db_path,
            bind_addr,
            log_level,
            log_dir,
        })
    }
}
