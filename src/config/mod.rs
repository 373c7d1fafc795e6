//! Configuration management.
//!
//! Settings are loaded from a TOML file in the platform config directory
//! and validated before use. A missing file falls back to defaults.

use std::fs;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

mod settings;

pub use settings::{RefreshPolicy, Settings};

/// Errors that can occur when loading or saving configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// No platform config directory could be determined.
    #[error("Could not determine the configuration directory")]
    NoConfigDir,

    /// Failed to create the config directory.
    #[error("Failed to create configuration directory: {0}")]
    CreateDirError(std::io::Error),

    /// Failed to read the config file.
    #[error("Failed to read configuration file: {0}")]
    ReadError(std::io::Error),

    /// Failed to write the config file.
    #[error("Failed to write configuration file: {0}")]
    WriteError(std::io::Error),

    /// The config file is not valid TOML.
    #[error("Failed to parse configuration file: {0}")]
    ParseError(#[from] toml::de::Error),

    /// The config could not be serialized.
    #[error("Failed to serialize configuration: {0}")]
    SerializeError(#[from] toml::ser::Error),

    /// A setting has an invalid value.
    #[error("Invalid configuration: {0}")]
    ValidationError(String),
}

/// Result type for configuration operations.
pub type Result<T> = std::result::Result<T, ConfigError>;

/// The application configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// Application settings.
    #[serde(default)]
    pub settings: Settings,
}

impl Config {
    /// Load the configuration from the default location.
    ///
    /// A missing file yields the defaults; an unreadable or invalid file is
    /// an error.
    pub fn load() -> Result<Self> {
        let path = Self::config_path()?;
        if !path.exists() {
            debug!(?path, "no configuration file, using defaults");
            return Ok(Self::default());
        }

        let content = fs::read_to_string(&path).map_err(ConfigError::ReadError)?;
        let config: Config = toml::from_str(&content)?;
        config.validate()?;
        debug!(?path, "configuration loaded");
        Ok(config)
    }

    /// Save the configuration to the default location.
    pub fn save(&self) -> Result<()> {
        let path = Self::config_path()?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(ConfigError::CreateDirError)?;
        }

        let content = toml::to_string_pretty(self)?;
        fs::write(&path, content).map_err(ConfigError::WriteError)
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<()> {
        let url = &self.settings.server_url;
        if url.is_empty() {
            return Err(ConfigError::ValidationError(
                "server URL cannot be empty".to_string(),
            ));
        }
        if !url.starts_with("http://") && !url.starts_with("https://") {
            return Err(ConfigError::ValidationError(format!(
                "server URL '{}' must start with http:// or https://",
                url
            )));
        }
        Ok(())
    }

    /// The path of the configuration file.
    pub fn config_path() -> Result<PathBuf> {
        let dir = dirs::config_dir().ok_or(ConfigError::NoConfigDir)?;
        Ok(dir.join("helpdesk").join("config.toml"))
    }
}
