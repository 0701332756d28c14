//! Configuration module for SHED.

use serde::Deserialize;
use std::path::Path;

use crate::{Result, ShedError};

/// HTTP server configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Host address to bind.
    #[serde(default = "default_host")]
    pub host: String,
    /// Port number to listen on.
    #[serde(default = "default_port")]
    pub port: u16,
    /// CORS allowed origins. Empty means permissive (development mode).
    #[serde(default)]
    pub cors_origins: Vec<String>,
    /// Maximum size of a single uploaded file in megabytes.
    #[serde(default = "default_max_upload_size")]
    pub max_upload_size_mb: u64,
    /// Cache-Control max-age for served files, in seconds.
    #[serde(default = "default_cache_max_age")]
    pub cache_max_age_secs: u64,
    /// Whether to serve the bundled browser UI.
    #[serde(default)]
    pub serve_ui: bool,
    /// Path to the built UI assets directory.
    #[serde(default = "default_ui_path")]
    pub ui_path: String,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

fn default_max_upload_size() -> u64 {
    50
}

fn default_cache_max_age() -> u64 {
    3600
}

fn default_ui_path() -> String {
    "web/dist".to_string()
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            cors_origins: vec![],
            max_upload_size_mb: default_max_upload_size(),
            cache_max_age_secs: default_cache_max_age(),
            serve_ui: false,
            ui_path: default_ui_path(),
        }
    }
}

/// File storage configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct StorageConfig {
    /// Root directory all served and uploaded files live under.
    /// Created at startup if missing.
    #[serde(default = "default_storage_root")]
    pub root: String,
    /// Whether the root-containment check compares paths case-sensitively.
    ///
    /// The default follows the platform: case-insensitive on Windows,
    /// case-sensitive elsewhere. Forcing the non-native mode can over- or
    /// under-match on the actual filesystem; change it only when serving
    /// from a mount whose semantics differ from the host's.
    #[serde(default = "default_case_sensitive")]
    pub case_sensitive_paths: bool,
}

fn default_storage_root() -> String {
    "data/files".to_string()
}

fn default_case_sensitive() -> bool {
    cfg!(not(windows))
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            root: default_storage_root(),
            case_sensitive_paths: default_case_sensitive(),
        }
    }
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
    "logs/shed.log".to_string()
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
    /// HTTP server configuration.
    #[serde(default)]
    pub server: ServerConfig,
    /// File storage configuration.
    #[serde(default)]
    pub storage: StorageConfig,
    /// Logging configuration.
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref()).map_err(ShedError::Io)?;
        Self::parse(&content)
    }

    /// Load configuration from a TOML file and apply environment variable overrides.
    pub fn load_with_env<P: AsRef<Path>>(path: P) -> Result<Self> {
        let mut config = Self::load(path)?;
        config.apply_env_overrides();
        Ok(config)
    }

    /// Parse configuration from a TOML string.
    pub fn parse(s: &str) -> Result<Self> {
        toml::from_str(s).map_err(|e| ShedError::Config(format!("config parse error: {e}")))
    }

    /// Apply environment variable overrides to the configuration.
    ///
    /// Supported environment variables:
    /// - `SHED_STORAGE_ROOT`: Override the storage root directory
    pub fn apply_env_overrides(&mut self) {
        if let Ok(root) = std::env::var("SHED_STORAGE_ROOT") {
            if !root.is_empty() {
                self.storage.root = root;
            }
        }
    }

    /// Validate the configuration.
    ///
    /// Returns an error if the storage root is empty.
    pub fn validate(&self) -> Result<()> {
        if self.storage.root.trim().is_empty() {
            return Err(ShedError::Config(
                "storage.root is not set. \
                 Set it in config.toml or via the SHED_STORAGE_ROOT environment variable."
                    .to_string(),
            ));
        }
        Ok(())
    }
}
