//! Configuration management for Rillet.
//!
//! Configuration is read from `~/.config/rillet/config.toml` at startup.
//! If the file doesn't exist, a default configuration with comments is created.

use std::collections::BTreeMap;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::plugins::PluginSettings;
use crate::session::DEFAULT_POLL_INTERVAL_SECS;
use crate::transport::Credentials;

pub const DEFAULT_SERVER_ADDRESS: &str = "http://localhost:8093";

/// Main configuration struct.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub server: ServerConfig,
    /// Default settings per plugin id.
    pub plugins: BTreeMap<String, PluginSettings>,
    pub monitor: MonitorConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub address: String,
    pub username: String,
    pub password: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            address: DEFAULT_SERVER_ADDRESS.to_string(),
            username: String::new(),
            password: String::new(),
        }
    }
}

impl ServerConfig {
    pub fn credentials(&self) -> Credentials {
        Credentials::new(&self.username, &self.password)
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct MonitorConfig {
    pub poll_interval_secs: u64,
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            poll_interval_secs: DEFAULT_POLL_INTERVAL_SECS,
        }
    }
}

impl Config {
    /// Load configuration from the default path.
    ///
    /// If the config file doesn't exist, creates a default one with comments.
    /// If the config file exists but is invalid, returns an error.
    /// Missing fields in the config file will use default values.
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(&Self::default_config_path()?)
    }

    /// Load configuration from `path`, creating it with defaults if missing.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            Self::create_default_config(path)?;
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;

        toml::from_str(&content).map_err(|e| ConfigError::Parse {
            path: path.to_path_buf(),
            source: e,
        })
    }

    /// Get the default config file path: `~/.config/rillet/config.toml`
    pub fn default_config_path() -> Result<PathBuf, ConfigError> {
        let config_dir = dirs::config_dir().ok_or(ConfigError::NoConfigDir)?;
        Ok(config_dir.join("rillet").join("config.toml"))
    }

    /// Command-line values win over the file.
    pub fn with_overrides(
        mut self,
        address: Option<String>,
        username: Option<String>,
        password: Option<String>,
    ) -> Self {
        if let Some(address) = address {
            self.server.address = address;
        }
        if let Some(username) = username {
            self.server.username = username;
        }
        if let Some(password) = password {
            self.server.password = password;
        }
        self
    }

    /// Configured defaults for a plugin, empty when none are set.
    pub fn plugin_settings(&self, id: &str) -> PluginSettings {
        self.plugins.get(id).cloned().unwrap_or_default()
    }

    fn create_default_config(path: &Path) -> Result<(), ConfigError> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|e| ConfigError::Io {
                path: parent.to_path_buf(),
                source: e,
            })?;
        }

        let mut file = fs::File::create(path).map_err(|e| ConfigError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;

        file.write_all(Self::default_config_content().as_bytes())
            .map_err(|e| ConfigError::Io {
                path: path.to_path_buf(),
                source: e,
            })?;

        Ok(())
    }

    fn default_config_content() -> &'static str {
        r##"# Rillet Configuration

[server]
# Address of the download manager's web interface
address = "http://localhost:8093"

# HTTP Basic credentials. Leave both empty to connect without authentication.
username = ""
password = ""

[monitor]
# Seconds between status polls while a subscription update is running
poll_interval_secs = 3

# Default settings for extraction plugins, keyed by plugin id.
# Settings given with `rillet extract -s key=value` take precedence.
#
# [plugins.dailymotion]
# type = "search"
# videoFormat = "720"
#
# [plugins.rapidvideo]
# format = "720"
#
# [plugins.wordpress]
# host = "blog.example.com"
# limit = 20
"##
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Could not determine config directory")]
    NoConfigDir,

    #[error("Failed to read/write config file at {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse config file at {path}: {source}")]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },
}
