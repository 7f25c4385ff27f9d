//! Configuration for a quire session, stored as TOML.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("config io: {0}")]
    Read(#[from] std::io::Error),

    #[error("config is not valid toml: {0}")]
    Parse(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct QuireConfig {
    /// Status endpoint of the remote worker.
    pub status_url: String,
    pub poll_interval_ms: u64,
    pub request_timeout_ms: u64,
    /// Consecutive poll failures before a warning is raised.
    pub failure_warn_threshold: u32,
    /// Where the task list is persisted.
    pub store_path: PathBuf,
}

impl Default for QuireConfig {
    fn default() -> Self {
        Self {
            status_url: "http://127.0.0.1:5000/api/download/status".to_owned(),
            poll_interval_ms: 1500,
            request_timeout_ms: 5000,
            failure_warn_threshold: 5,
            store_path: default_store_path(),
        }
    }
}

impl QuireConfig {
    /// Load configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        toml::from_str(&content).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    /// Like `from_file`, but a missing file yields the defaults.
    pub fn load_or_default(path: &Path) -> Result<Self, ConfigError> {
        match Self::from_file(path) {
            Err(ConfigError::Read(e)) if e.kind() == std::io::ErrorKind::NotFound => {
                Ok(Self::default())
            }
            other => other,
        }
    }

    /// Save configuration to a TOML file, creating parent directories as needed.
    pub fn save_to_file(&self, path: &Path) -> Result<(), ConfigError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content =
            toml::to_string_pretty(self).map_err(|e| ConfigError::Parse(e.to_string()))?;
        std::fs::write(path, content)?;
        Ok(())
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms.max(1))
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_ms)
    }

    /// Returns the default config file path: `~/.config/quire/config.toml`.
    pub fn default_config_path() -> PathBuf {
        if let Some(config) = std::env::var_os("XDG_CONFIG_HOME") {
            PathBuf::from(config).join("quire").join("config.toml")
        } else if let Some(home) = std::env::var_os("HOME") {
            PathBuf::from(home)
                .join(".config")
                .join("quire")
                .join("config.toml")
        } else {
            PathBuf::from("/tmp/quire-config/config.toml")
        }
    }
}

fn default_store_path() -> PathBuf {
    if let Some(data) = std::env::var_os("XDG_DATA_HOME") {
        PathBuf::from(data).join("quire").join("tasks.json")
    } else if let Some(home) = std::env::var_os("HOME") {
        PathBuf::from(home)
            .join(".local")
            .join("share")
            .join("quire")
            .join("tasks.json")
    } else {
        PathBuf::from("/tmp/quire-data/tasks.json")
    }
}
