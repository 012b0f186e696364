//! Application configuration
//!
//! Resolution order, later wins:
//! 1. Built-in defaults
//! 2. Optional TOML file
//! 3. Environment (`TAIGA_URL`, `BURNDOWN_MAX_CONCURRENCY`)
//! 4. Command line flags (applied by the binary)

use burndown_core::BurndownConfig;
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use taiga_client::{TaigaConfig, TAIGA_URL_ENV};

/// Environment variable bounding in-flight story fetches
pub const MAX_CONCURRENCY_ENV: &str = "BURNDOWN_MAX_CONCURRENCY";

/// Configuration loading errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Config file could not be read
    #[error("cannot read config {path}: {source}")]
    Io {
        /// File that was requested
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// Config file is not valid TOML for this schema
    #[error("invalid config: {0}")]
    Parse(#[from] toml::de::Error),

    /// A setting is out of range
    #[error("{field} must be at least 1, got {value}")]
    OutOfRange {
        /// Setting name
        field: &'static str,
        /// Offending value
        value: u64,
    },

    /// Environment override has an unusable value
    #[error("invalid value {value:?} for {var}")]
    InvalidEnv {
        /// Variable name
        var: &'static str,
        /// Offending value
        value: String,
    },
}

/// HTTP endpoint settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Listen address
    pub bind: SocketAddr,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: SocketAddr::from(([127, 0, 0, 1], 5000)),
        }
    }
}

/// Everything the binary needs
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Tracker API
    pub taiga: TaigaConfig,
    /// Engine
    pub burndown: BurndownConfig,
    /// HTTP endpoint
    pub server: ServerConfig,
}

impl AppConfig {
    /// Load from an optional file, then apply process environment overrides
    ///
    /// # Errors
    /// Unreadable or invalid file, or an invalid environment override.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let config = match path {
            Some(path) => Self::from_file(path)?,
            None => Self::default(),
        };
        config.with_overrides(|var| std::env::var(var).ok())
    }

    /// Parse a TOML file
    ///
    /// # Errors
    /// Unreadable or invalid file.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&raw)
    }

    /// Parse TOML text
    ///
    /// # Errors
    /// Invalid TOML or schema mismatch.
    pub fn from_toml_str(raw: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(raw)?;
        config.validate()
    }

    fn validate(self) -> Result<Self, ConfigError> {
        let checks = [
            ("burndown.fetch_deadline_secs", self.burndown.fetch_deadline_secs),
            (
                "burndown.max_concurrent_fetches",
                u64::try_from(self.burndown.max_concurrent_fetches).unwrap_or(u64::MAX),
            ),
        ];
        match checks.into_iter().find(|(_, value)| *value == 0) {
            Some((field, value)) => Err(ConfigError::OutOfRange { field, value }),
            None => Ok(self),
        }
    }

    /// Apply overrides from `lookup` (normally the process environment)
    ///
    /// # Errors
    /// `ConfigError::InvalidEnv` when the concurrency override is not a
    /// positive integer.
    pub fn with_overrides(
        mut self,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<Self, ConfigError> {
        if let Some(url) = lookup(TAIGA_URL_ENV).filter(|u| !u.trim().is_empty()) {
            self.taiga = self.taiga.with_base_url(url.trim());
        }
        if let Some(raw) = lookup(MAX_CONCURRENCY_ENV) {
            let max = raw
                .trim()
                .parse::<usize>()
                .ok()
                .filter(|n| *n > 0)
                .ok_or(ConfigError::InvalidEnv {
                    var: MAX_CONCURRENCY_ENV,
                    value: raw.clone(),
                })?;
            self.burndown = self.burndown.with_max_concurrent_fetches(max);
        }
        Ok(self)
    }
}
