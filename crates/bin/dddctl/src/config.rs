//! Configuration loading — TOML file with environment variable overrides.
//!
//! Looks for `ddd.toml` in the working directory. Every field has a default
//! matching the stock robot firmware, so the file is optional. Environment
//! variables take precedence over file values.

use ddd_adapter_ble::BleConfig;
use ddd_domain::error::ValidationError;
use serde::Deserialize;

/// Name of the optional configuration file.
pub const CONFIG_FILE: &str = "ddd.toml";

/// Top-level configuration.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Robot discovery and GATT settings.
    pub ble: BleConfig,
    /// Logging settings.
    pub logging: LoggingConfig,
}

/// Logging configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Filter directive (`RUST_LOG` syntax).
    pub filter: String,
}

impl Config {
    /// Load configuration from `ddd.toml` (if present) then apply
    /// environment-variable overrides.
    ///
    /// # Errors
    ///
    /// Returns an error if the TOML file exists but is malformed, or if the
    /// resulting configuration is invalid.
    pub fn load() -> Result<Self, ConfigError> {
        let mut config = Self::from_file(CONFIG_FILE)?;
        config.apply_overrides(|key| std::env::var(key).ok());
        config.validate()?;
        Ok(config)
    }

    fn from_file(path: &str) -> Result<Self, ConfigError> {
        match std::fs::read_to_string(path) {
            Ok(content) => toml::from_str(&content).map_err(ConfigError::Parse),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(Self::default()),
            Err(err) => Err(ConfigError::Io(err)),
        }
    }

    fn apply_overrides(&mut self, var: impl Fn(&str) -> Option<String>) {
        if let Some(val) = var("DDD_PERIPHERAL_NAME") {
            self.ble.peripheral_name = val;
        }
        if let Some(val) = var("DDD_CONNECT_TIMEOUT_SECS") {
            if let Ok(secs) = val.parse() {
                self.ble.connect_timeout_secs = secs;
            }
        }
        if let Some(val) = var("DDD_LOG") {
            self.logging.filter = val;
        }
        if let Some(val) = var("RUST_LOG") {
            self.logging.filter = val;
        }
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.ble.peripheral_name.trim().is_empty() {
            return Err(ValidationError::EmptyName.into());
        }
        Ok(())
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: "ddd=info,btleplug=warn".to_string(),
        }
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// TOML parse failure.
    #[error("failed to parse config file")]
    Parse(#[from] toml::de::Error),
    /// File I/O failure.
    #[error("failed to read config file")]
    Io(#[from] std::io::Error),
    /// Semantic validation failure.
    #[error("invalid configuration")]
    Validation(#[from] ValidationError),
}
