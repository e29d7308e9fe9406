//! Application configuration.
//!
//! Settings are read from a TOML file and then overridden by environment
//! variables. Every setting has a default, so an absent file is not an error
//! for [`AppConfig::load`].

use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

/// Name of the configuration file searched for by [`AppConfig::from_default_location`].
pub const CONFIG_FILE_NAME: &str = "maude-trends.toml";

/// Error type for configuration loading.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config file: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Invalid value '{value}' for environment variable {key}")]
    InvalidEnv { key: String, value: String },

    #[error("No {0} found in standard locations")]
    NotFound(String),
}

/// Complete application configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub upstream: UpstreamSettings,
    #[serde(default)]
    pub server: ServerSettings,
    #[serde(default)]
    pub dashboard: DashboardSettings,
}

/// Where and how to reach the upstream adverse-event API.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpstreamSettings {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default = "default_endpoint")]
    pub endpoint: String,
    /// Optional key; the API serves keyless requests at a lower rate limit.
    #[serde(default)]
    pub api_key: Option<String>,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

/// HTTP server bind settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerSettings {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
}

/// Defaults applied to dashboard requests.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DashboardSettings {
    /// Number of years before the current one covered when a request names no range.
    #[serde(default = "default_year_span")]
    pub default_year_span: u32,
}

fn default_base_url() -> String {
    "https://api.fda.gov/".to_string()
}

fn default_endpoint() -> String {
    "device/event.json".to_string()
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

fn default_year_span() -> u32 {
    5
}

impl Default for UpstreamSettings {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            endpoint: default_endpoint(),
            api_key: None,
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

impl Default for DashboardSettings {
    fn default() -> Self {
        Self {
            default_year_span: default_year_span(),
        }
    }
}

impl AppConfig {
    /// Load configuration from a TOML file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(toml::from_str(&content)?)
    }

    /// Load configuration from the first standard location that exists.
    ///
    /// Searches for `maude-trends.toml` in:
    /// 1. Current directory
    /// 2. `backend/` directory
    /// 3. Parent directory
    pub fn from_default_location() -> Result<Self, ConfigError> {
        let search_paths = [
            PathBuf::from(CONFIG_FILE_NAME),
            PathBuf::from("backend").join(CONFIG_FILE_NAME),
            PathBuf::from("..").join(CONFIG_FILE_NAME),
        ];

        for path in search_paths {
            if path.exists() {
                return Self::from_file(&path);
            }
        }

        Err(ConfigError::NotFound(CONFIG_FILE_NAME.to_string()))
    }

    /// File configuration if one is found, defaults otherwise, then environment overrides.
    pub fn load() -> Result<Self, ConfigError> {
        let mut config = match Self::from_default_location() {
            Ok(config) => config,
            Err(ConfigError::NotFound(_)) => {
                log::info!("No {} found, using default settings", CONFIG_FILE_NAME);
                Self::default()
            }
            Err(e) => return Err(e),
        };
        config.apply_env_overrides()?;
        Ok(config)
    }

    /// Override settings from the environment.
    ///
    /// # Environment Variables
    /// - `OPEN_FDA_API_KEY`: upstream API key
    /// - `OPEN_FDA_BASE_URL`: upstream base URL
    /// - `HOST`: server host
    /// - `PORT`: server port
    pub fn apply_env_overrides(&mut self) -> Result<(), ConfigError> {
        if let Ok(key) = env::var("OPEN_FDA_API_KEY") {
            if !key.trim().is_empty() {
                self.upstream.api_key = Some(key);
            }
        }
        if let Ok(url) = env::var("OPEN_FDA_BASE_URL") {
            self.upstream.base_url = url;
        }
        if let Ok(host) = env::var("HOST") {
            self.server.host = host;
        }
        if let Ok(port) = env::var("PORT") {
            self.server.port = port.parse().map_err(|_| ConfigError::InvalidEnv {
                key: "PORT".to_string(),
                value: port.clone(),
            })?;
        }
        Ok(())
    }

    /// `host:port` string for binding the server.
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}
