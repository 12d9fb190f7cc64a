//! Configuration module for filedrop.

use axum::http::HeaderName;
use serde::Deserialize;
use std::path::Path;

use crate::{FiledropError, Result};

/// Server configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Host address to bind.
    #[serde(default = "default_host")]
    pub host: String,
    /// Port number to listen on.
    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

/// Storage configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct StorageConfig {
    /// Path to the storage root directory.
    #[serde(default = "default_storage_path")]
    pub path: String,
    /// Maximum upload request size in megabytes.
    #[serde(default = "default_max_upload_size")]
    pub max_upload_size_mb: u64,
}

fn default_storage_path() -> String {
    "files".to_string()
}

fn default_max_upload_size() -> u64 {
    1024
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            path: default_storage_path(),
            max_upload_size_mb: default_max_upload_size(),
        }
    }
}

/// Shared-secret configuration.
#[derive(Clone, Deserialize)]
pub struct AuthConfig {
    /// Shared secret every protected request must carry.
    #[serde(default = "default_api_key")]
    pub api_key: String,
    /// Name of the request header carrying the secret.
    #[serde(default = "default_api_key_header")]
    pub header: String,
}

fn default_api_key() -> String {
    "default_api_key".to_string()
}

fn default_api_key_header() -> String {
    "X-API-Key".to_string()
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            api_key: default_api_key(),
            header: default_api_key_header(),
        }
    }
}

impl std::fmt::Debug for AuthConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthConfig")
            .field("api_key", &"[REDACTED]")
            .field("header", &self.header)
            .finish()
    }
}

/// Web configuration.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct WebConfig {
    /// CORS allowed origins.
    #[serde(default)]
    pub cors_origins: Vec<String>,
    /// Optional HTML template replacing the built-in stats page.
    #[serde(default)]
    pub stats_template: Option<String>,
}

/// Logging configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub level: String,
    /// Path to the log file.
    #[serde(default = "default_log_file")]
    pub file: String,
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_file() -> String {
    "logs/filedrop.log".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            file: default_log_file(),
        }
    }
}

/// Main configuration structure.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct Config {
    /// Server configuration.
    #[serde(default)]
    pub server: ServerConfig,
    /// Storage configuration.
    #[serde(default)]
    pub storage: StorageConfig,
    /// Shared-secret configuration.
    #[serde(default)]
    pub auth: AuthConfig,
    /// Web configuration.
    #[serde(default)]
    pub web: WebConfig,
    /// Logging configuration.
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref()).map_err(FiledropError::Io)?;
        Self::parse(&content)
    }

    /// Parse configuration from a TOML string.
    pub fn parse(s: &str) -> Result<Self> {
        toml::from_str(s).map_err(|e| FiledropError::Config(format!("config parse error: {e}")))
    }

    /// Apply environment variable overrides to the configuration.
    ///
    /// Supported environment variables:
    /// - `API_KEY`: Override the shared secret
    /// - `PORT`: Override the listening port
    pub fn apply_env_overrides(&mut self) {
        self.apply_overrides_from(|name| std::env::var(name).ok());
    }

    /// Apply overrides from an arbitrary variable source.
    ///
    /// Empty values are ignored, as are ports that do not parse.
    pub fn apply_overrides_from<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(api_key) = lookup("API_KEY").filter(|v| !v.is_empty()) {
            self.auth.api_key = api_key;
        }

        if let Some(port) = lookup("PORT").and_then(|v| v.parse::<u16>().ok()) {
            self.server.port = port;
        }
    }

    /// Validate the configuration.
    ///
    /// Returns an error if:
    /// - the shared secret is empty
    /// - the secret header name is not a valid HTTP header name
    /// - the upload limit is zero
    pub fn validate(&self) -> Result<()> {
        if self.auth.api_key.is_empty() {
            return Err(FiledropError::Config(
                "api_key is empty. Set it in config.toml or via the API_KEY environment variable."
                    .to_string(),
            ));
        }

        if HeaderName::try_from(self.auth.header.as_str()).is_err() {
            return Err(FiledropError::Config(format!(
                "invalid auth header name: {:?}",
                self.auth.header
            )));
        }

        if self.storage.max_upload_size_mb == 0 {
            return Err(FiledropError::Config(
                "max_upload_size_mb must be greater than zero".to_string(),
            ));
        }

        Ok(())
    }

    /// Upload limit in bytes.
    pub fn max_upload_bytes(&self) -> usize {
        usize::try_from(self.storage.max_upload_size_mb.saturating_mul(1024 * 1024))
            .unwrap_or(usize::MAX)
    }
}
