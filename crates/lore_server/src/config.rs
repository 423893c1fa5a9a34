//! Server configuration.

use lore_error::ConfigError;
use lore_poll::LedgerConfig;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Environment variable overriding [`ServerConfig::bind_address`].
pub const ENV_BIND_ADDRESS: &str = "LORE_BIND_ADDRESS";
/// Environment variable overriding [`ServerConfig::user_header`].
pub const ENV_USER_HEADER: &str = "LORE_USER_HEADER";
/// Environment variable overriding [`ServerConfig::log_format`].
pub const ENV_LOG_FORMAT: &str = "LORE_LOG_FORMAT";

/// Log output format.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Default,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum LogFormat {
    /// Human-readable lines
    #[default]
    Pretty,
    /// One JSON object per line
    Json,
}

/// Configuration for the LoreTogether server, loaded from TOML.
///
/// ```toml
/// bind_address = "0.0.0.0:8080"
/// user_header = "x-forwarded-user"
/// log_format = "json"
/// seed_sample = true
///
/// [ledger]
/// marker_strategy = "atomic"
/// ```
#[derive(
    Debug,
    Clone,
    PartialEq,
    Eq,
    Serialize,
    Deserialize,
    derive_getters::Getters,
    derive_setters::Setters,
    derive_builder::Builder,
)]
#[serde(default)]
#[setters(prefix = "with_", into)]
#[builder(setter(into), default)]
pub struct ServerConfig {
    /// Socket address to listen on
    bind_address: String,
    /// Request header carrying the authenticated user id
    user_header: String,
    /// Log output format
    log_format: LogFormat,
    /// Poll ledger settings
    ledger: LedgerConfig,
    /// Publish the bundled sample story at start-up
    seed_sample: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_address: "127.0.0.1:3000".to_string(),
            user_header: "x-lore-user".to_string(),
            log_format: LogFormat::default(),
            ledger: LedgerConfig::default(),
            seed_sample: false,
        }
    }
}

impl ServerConfig {
    /// Returns a builder for constructing a ServerConfig.
    pub fn builder() -> ServerConfigBuilder {
        ServerConfigBuilder::default()
    }

    /// Load configuration from a TOML file. Missing settings take defaults.
    ///
    /// # Errors
    ///
    /// Returns error if the file cannot be read or the TOML is invalid.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path).map_err(|e| {
            ConfigError::new(format!("Failed to read {}: {}", path.display(), e))
        })?;
        Self::from_toml(&contents)
    }

    /// Parse configuration from TOML text.
    pub fn from_toml(contents: &str) -> Result<Self, ConfigError> {
        toml::from_str(contents).map_err(|e| ConfigError::new(format!("Invalid TOML: {}", e)))
    }

    /// Apply `LORE_*` environment variable overrides.
    pub fn with_env_overrides(self) -> Result<Self, ConfigError> {
        self.with_overrides(|key| std::env::var(key).ok())
    }

    /// Apply overrides from an arbitrary variable lookup.
    ///
    /// # Errors
    ///
    /// Returns error when `LORE_LOG_FORMAT` is not `pretty` or `json`.
    pub fn with_overrides(
        mut self,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<Self, ConfigError> {
        if let Some(address) = lookup(ENV_BIND_ADDRESS) {
            self.bind_address = address;
        }
        if let Some(header) = lookup(ENV_USER_HEADER) {
            self.user_header = header;
        }
        if let Some(format) = lookup(ENV_LOG_FORMAT) {
            self.log_format = format.parse().map_err(|_| {
                ConfigError::new(format!(
                    "{} must be 'pretty' or 'json', got '{}'",
                    ENV_LOG_FORMAT, format
                ))
            })?;
        }
        Ok(self)
    }
}
