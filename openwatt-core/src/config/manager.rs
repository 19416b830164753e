//! Loading and saving of configuration files

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::settings::AppSettings;
use crate::error::{ConfigError, ConfigResult};
use crate::models::Endpoint;

/// File name of the application settings
pub const CONFIG_FILE: &str = "config.toml";

/// File name of the endpoint list
pub const ENDPOINTS_FILE: &str = "endpoints.toml";

const APP_DIR: &str = "openwatt";

/// On-disk layout of `endpoints.toml`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EndpointFile {
    /// Identifier of the current endpoint
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub current: Option<Uuid>,
    /// Registered endpoints
    #[serde(default)]
    pub endpoints: Vec<Endpoint>,
}

/// Reads and writes the files in the configuration directory
#[derive(Debug, Clone)]
pub struct ConfigManager {
    config_dir: PathBuf,
}

impl ConfigManager {
    /// Creates a manager for the platform configuration directory
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::NoConfigDir` if the platform has no
    /// configuration directory.
    pub fn new() -> ConfigResult<Self> {
        let base = dirs::config_dir().ok_or(ConfigError::NoConfigDir)?;
        Ok(Self::with_config_dir(base.join(APP_DIR)))
    }

    /// Creates a manager for a custom directory
    #[must_use]
    pub const fn with_config_dir(config_dir: PathBuf) -> Self {
        Self { config_dir }
    }

    /// Returns the configuration directory
    #[must_use]
    pub fn config_dir(&self) -> &Path {
        &self.config_dir
    }

    /// Loads `config.toml`, returning defaults if it does not exist
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read or parsed.
    pub fn load_settings(&self) -> ConfigResult<AppSettings> {
        self.load_or_default(CONFIG_FILE)
    }

    /// Saves `config.toml`
    ///
    /// # Errors
    ///
    /// Returns an error if the directory or file cannot be written.
    pub fn save_settings(&self, settings: &AppSettings) -> ConfigResult<()> {
        self.save(CONFIG_FILE, settings)
    }

    /// Loads `endpoints.toml`, returning an empty list if it does not exist
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read or parsed.
    pub fn load_endpoints(&self) -> ConfigResult<EndpointFile> {
        self.load_or_default(ENDPOINTS_FILE)
    }

    /// Saves `endpoints.toml`
    ///
    /// # Errors
    ///
    /// Returns an error if the directory or file cannot be written.
    pub fn save_endpoints(&self, file: &EndpointFile) -> ConfigResult<()> {
        self.save(ENDPOINTS_FILE, file)
    }

    fn load_or_default<T>(&self, name: &str) -> ConfigResult<T>
    where
        T: for<'de> Deserialize<'de> + Default,
    {
        let path = self.config_dir.join(name);
        if !path.exists() {
            tracing::debug!(path = %path.display(), "Config file missing, using defaults");
            return Ok(T::default());
        }

        let content = fs::read_to_string(&path).map_err(|source| ConfigError::Io {
            path: path.clone(),
            source,
        })?;

        toml::from_str(&content).map_err(|e| ConfigError::Parse {
            path,
            reason: e.to_string(),
        })
    }

    fn save<T: Serialize>(&self, name: &str, value: &T) -> ConfigResult<()> {
        fs::create_dir_all(&self.config_dir).map_err(|source| ConfigError::Io {
            path: self.config_dir.clone(),
            source,
        })?;

        let path = self.config_dir.join(name);
        let content =
            toml::to_string_pretty(value).map_err(|e| ConfigError::Serialize(e.to_string()))?;

        fs::write(&path, content).map_err(|source| ConfigError::Io {
            path: path.clone(),
            source,
        })?;

        tracing::debug!(path = %path.display(), "Saved config file");
        Ok(())
    }
}
