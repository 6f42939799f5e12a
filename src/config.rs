//! Configuration System
//!
//! Handles loading configuration from files and environment variables.
//! Supports TOML config files and environment variable overrides.

use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::gateway::DEFAULT_API_BASE;
use crate::state::DEFAULT_STORAGE_KEY;

/// Main configuration structure
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub api: ApiConfig,

    #[serde(default)]
    pub storage: StorageConfig,

    #[serde(default)]
    pub session: SessionConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Account API configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ApiConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,
}

fn default_base_url() -> String {
    DEFAULT_API_BASE.to_string()
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
        }
    }
}

/// Session persistence configuration
#[derive(Debug, Clone, Deserialize)]
pub struct StorageConfig {
    #[serde(default = "default_data_dir")]
    pub data_dir: String,

    #[serde(default = "default_file_name")]
    pub file_name: String,

    /// Key the saved account is stored under
    #[serde(default = "default_key")]
    pub key: String,
}

fn default_data_dir() -> String {
    dirs::data_local_dir()
        .map(|p| p.join("bank-client").to_string_lossy().to_string())
        .unwrap_or_else(|| "./bank_data".to_string())
}

fn default_file_name() -> String {
    "session.json".to_string()
}

fn default_key() -> String {
    DEFAULT_STORAGE_KEY.to_string()
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            file_name: default_file_name(),
            key: default_key(),
        }
    }
}

impl StorageConfig {
    /// Full path of the session file, with a leading `~/` expanded
    pub fn session_path(&self) -> PathBuf {
        expand_home(&self.data_dir).join(&self.file_name)
    }
}

fn expand_home(path: &str) -> PathBuf {
    match (path.strip_prefix("~/"), dirs::home_dir()) {
        (Some(rest), Some(home)) => home.join(rest),
        _ => PathBuf::from(path),
    }
}

/// Session behaviour configuration
#[derive(Debug, Clone, Deserialize)]
pub struct SessionConfig {
    /// Log out when a dashboard refresh cannot reach the API
    #[serde(default = "default_logout_on_network_failure")]
    pub logout_on_network_failure: bool,
}

fn default_logout_on_network_failure() -> bool {
    true
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            logout_on_network_failure: default_logout_on_network_failure(),
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,

    #[serde(default = "default_log_format")]
    pub format: String,
}

fn default_log_level() -> String {
    "warn".to_string()
}

fn default_log_format() -> String {
    "pretty".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

impl Config {
    /// Load configuration from a file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.to_path_buf(),
            error: e.to_string(),
        })?;

        Self::parse(&content).map_err(|e| ConfigError::Parse {
            path: path.to_path_buf(),
            error: e.to_string(),
        })
    }

    /// Parse configuration from TOML text
    pub fn parse(content: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(content)
    }

    /// Load configuration from environment variables only
    pub fn from_env() -> Self {
        let mut config = Config::default();
        config.apply_env_overrides();
        config
    }

    /// Load configuration with environment variable overrides
    pub fn load_with_env(path: &Path) -> Result<Self, ConfigError> {
        let mut config = Self::load(path)?;
        config.apply_env_overrides();
        Ok(config)
    }

    /// Load from default locations or environment
    pub fn load_default() -> Self {
        let config_paths = [
            dirs::config_dir().map(|p| p.join("bank-client").join("config.toml")),
            Some(PathBuf::from("./config.toml")),
        ];

        for path in config_paths.iter().flatten() {
            if path.exists() {
                match Self::load_with_env(path) {
                    Ok(config) => {
                        tracing::info!("Loaded config from {:?}", path);
                        return config;
                    }
                    Err(e) => {
                        tracing::warn!("Failed to load config from {:?}: {}", path, e);
                    }
                }
            }
        }

        tracing::debug!("Using default config with environment overrides");
        Self::from_env()
    }

    /// Apply environment variable overrides to an existing config
    pub fn apply_env_overrides(&mut self) {
        self.apply_overrides(|name| std::env::var(name).ok());
    }

    /// Apply overrides from any variable source
    fn apply_overrides(&mut self, var: impl Fn(&str) -> Option<String>) {
        if let Some(url) = var("BANK_API_URL") {
            self.api.base_url = url;
        }

        if let Some(data_dir) = var("BANK_DATA_DIR") {
            self.storage.data_dir = data_dir;
        }
        if let Some(key) = var("BANK_STORAGE_KEY") {
            self.storage.key = key;
        }

        if let Some(flag) = var("BANK_LOGOUT_ON_NETWORK_FAILURE") {
            if let Ok(flag) = flag.parse() {
                self.session.logout_on_network_failure = flag;
            }
        }

        if let Some(level) = var("BANK_LOG_LEVEL") {
            self.logging.level = level;
        }
        if let Some(format) = var("BANK_LOG_FORMAT") {
            self.logging.format = format;
        }
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path:?}: {error}")]
    Io { path: PathBuf, error: String },

    #[error("Failed to parse config file {path:?}: {error}")]
    Parse { path: PathBuf, error: String },
}

/// Generate a default config file content
pub fn generate_default_config() -> String {
    r#"# Bank Client Configuration
#
# Environment variables override these settings:
# - BANK_API_URL
# - BANK_DATA_DIR
# - BANK_STORAGE_KEY
# - BANK_LOGOUT_ON_NETWORK_FAILURE
# - BANK_LOG_LEVEL
# - BANK_LOG_FORMAT

[api]
# Account API base URL
base_url = "http://localhost:5000/api"

[storage]
# Directory holding the saved session
data_dir = "~/.local/share/bank-client"

# Session file name inside data_dir
file_name = "session.json"

# Key the saved account is stored under
key = "savedAccount"

[session]
# Log out when the dashboard cannot reach the API.
# When false, the cached account stays on screen with an error.
logout_on_network_failure = true

[logging]
# Log level: trace, debug, info, warn, error
level = "warn"

# Log format: pretty (for development) or json
format = "pretty"
"#
    .to_string()
}
