//! HTTP Server Configuration
//!
//! Listen address, shared API key, store/feed tuning and CORS settings.
//!
//! Values are layered: defaults, then an optional JSON file, then the
//! environment (`API_KEY`, `PORT`). CLI flags are applied last by the caller.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::feed::DEFAULT_CADENCE;
use crate::telemetry::DEFAULT_HISTORY_CAPACITY;

/// Configuration errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config {}: {source}", path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Invalid config JSON: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Invalid value for {key}: {message}")]
    Invalid { key: &'static str, message: String },
}

/// HTTP server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Host to bind to (default: "0.0.0.0")
    #[serde(default = "default_host")]
    pub host: String,

    /// Port to bind to (default: 3000)
    #[serde(default = "default_port")]
    pub port: u16,

    /// Shared secret expected in `x-api-key` on writes. Writes are refused
    /// when unset.
    #[serde(default)]
    pub api_key: Option<String>,

    /// History bound (default: 5000)
    #[serde(default = "default_history_capacity")]
    pub history_capacity: usize,

    /// Live feed polling cadence in milliseconds (default: 400)
    #[serde(default = "default_stream_interval_ms")]
    pub stream_interval_ms: u64,

    /// Directory with the static landing page (default: "public")
    #[serde(default = "default_public_dir")]
    pub public_dir: PathBuf,

    /// CORS allowed origins (default: empty, meaning any origin)
    #[serde(default)]
    pub cors_origins: Vec<String>,

    /// Default log filter when `RUST_LOG` is not set (default: "info")
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    3000
}

fn default_history_capacity() -> usize {
    DEFAULT_HISTORY_CAPACITY
}

fn default_stream_interval_ms() -> u64 {
    DEFAULT_CADENCE.as_millis() as u64
}

fn default_public_dir() -> PathBuf {
    PathBuf::from("public")
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            api_key: None,
            history_capacity: default_history_capacity(),
            stream_interval_ms: default_stream_interval_ms(),
            public_dir: default_public_dir(),
            cors_origins: Vec::new(),
            log_level: default_log_level(),
        }
    }
}

impl ServerConfig {
    /// Create a new config with specified port
    pub fn with_port(port: u16) -> Self {
        Self {
            port,
            ..Default::default()
        }
    }

    /// Set the shared API key
    pub fn with_api_key(mut self, key: impl Into<String>) -> Self {
        self.api_key = Some(key.into());
        self
    }

    /// Load configuration from a JSON file. Missing keys take defaults.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let config: ServerConfig = serde_json::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Apply `API_KEY` and `PORT` overrides using the given environment lookup
    pub fn apply_env_from<F>(&mut self, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(key) = lookup("API_KEY").filter(|k| !k.is_empty()) {
            self.api_key = Some(key);
        }
        if let Some(port) = lookup("PORT").filter(|p| !p.trim().is_empty()) {
            self.port = port.trim().parse().map_err(|_| ConfigError::Invalid {
                key: "PORT",
                message: format!("'{}' is not a valid port", port),
            })?;
        }
        Ok(())
    }

    /// Reject values the server cannot run with
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.history_capacity == 0 {
            return Err(ConfigError::Invalid {
                key: "history_capacity",
                message: "must be > 0".into(),
            });
        }
        if self.stream_interval_ms == 0 {
            return Err(ConfigError::Invalid {
                key: "stream_interval_ms",
                message: "must be > 0".into(),
            });
        }
        Ok(())
    }

    /// Live feed cadence
    pub fn stream_interval(&self) -> Duration {
        Duration::from_millis(self.stream_interval_ms)
    }

    /// Get the socket address string
    pub fn socket_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
