//! Configuration management for Coherence.
//!
//! Supports loading configuration from:
//! 1. Configuration files (YAML)
//! 2. `.env` files
//! 3. Environment variables (with `COHERENCE_` prefix)
//!
//! Configuration precedence (highest to lowest):
//! 1. Environment variables
//! 2. `.env` file
//! 3. Configuration file
//! 4. Default values

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

use coherence_metrics::MetricsConfig;

/// Complete configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Metrics model constants and alert thresholds.
    #[serde(default)]
    pub metrics: MetricsConfig,

    /// Result store settings.
    #[serde(default)]
    pub storage: StorageConfig,

    /// Logging settings.
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Storage backend kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    #[default]
    Sqlite,
    Memory,
}

impl std::str::FromStr for StorageBackend {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, ConfigError> {
        match s.to_ascii_lowercase().as_str() {
            "sqlite" => Ok(StorageBackend::Sqlite),
            "memory" => Ok(StorageBackend::Memory),
            other => Err(ConfigError::ValidationError(format!(
                "Unknown storage backend: {other}"
            ))),
        }
    }
}

/// Result store configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Storage backend: "sqlite" or "memory"
    #[serde(default)]
    pub backend: StorageBackend,

    /// Database file; defaults to `~/.coherence/coherence.db`
    #[serde(default)]
    pub path: Option<PathBuf>,

    /// How long a writer waits for a locked database, in milliseconds
    #[serde(default = "default_busy_timeout_ms")]
    pub busy_timeout_ms: u64,
}

impl StorageConfig {
    /// Database file to open, falling back to the per-user default.
    pub fn resolved_path(&self) -> PathBuf {
        self.path.clone().unwrap_or_else(default_db_path)
    }

    pub fn busy_timeout(&self) -> Duration {
        Duration::from_millis(self.busy_timeout_ms)
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        StorageConfig {
            backend: StorageBackend::default(),
            path: None,
            busy_timeout_ms: default_busy_timeout_ms(),
        }
    }
}

/// Logging configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level: "trace", "debug", "info", "warn", "error"
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Log format: "console" or "json"
    #[serde(default = "default_log_format")]
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        LoggingConfig {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

// Default value functions
fn default_busy_timeout_ms() -> u64 {
    5000
}

fn default_log_level() -> String {
    "warn".to_string()
}

fn default_log_format() -> String {
    "console".to_string()
}

/// `~/.coherence/coherence.db`, or the working directory when there is no home.
pub fn default_db_path() -> PathBuf {
    dirs::home_dir()
        .map(|home| home.join(".coherence"))
        .unwrap_or_else(|| PathBuf::from(".coherence"))
        .join("coherence.db")
}

impl Config {
    /// Load configuration from a YAML file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path.as_ref())
            .map_err(|e| ConfigError::IoError(format!("{}: {e}", path.as_ref().display())))?;
        Self::from_yaml(&contents)
    }

    /// Parse configuration from YAML text.
    pub fn from_yaml(text: &str) -> Result<Self, ConfigError> {
        let config: Config =
            serde_yaml_ng::from_str(text).map_err(|e| ConfigError::ParseError(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration with the following precedence:
    /// 1. Load from file if provided
    /// 2. Load .env file if it exists
    /// 3. Apply environment variable overrides
    pub fn load(config_file: Option<&Path>) -> Result<Self, ConfigError> {
        // Load .env file if it exists
        dotenvy::dotenv().ok();

        let config = match config_file {
            Some(path) => Self::from_file(path)?,
            None => Config::default(),
        };

        let config = config.merge_env(|key| std::env::var(key).ok())?;
        config.validate()?;
        Ok(config)
    }

    /// Merge `COHERENCE_*` variables into this configuration.
    ///
    /// Only variables that are set override the file-loaded (or default)
    /// values. A set but unparsable value is an error.
    pub fn merge_env(mut self, var: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        // Storage
        if let Some(v) = var("COHERENCE_STORAGE_BACKEND") {
            self.storage.backend = v.parse()?;
        }
        if let Some(v) = var("COHERENCE_DB_PATH") {
            self.storage.path = Some(PathBuf::from(v));
        }
        if let Some(v) = var("COHERENCE_BUSY_TIMEOUT_MS") {
            self.storage.busy_timeout_ms = v.parse().map_err(|_| {
                ConfigError::ValidationError(format!("Invalid COHERENCE_BUSY_TIMEOUT_MS: {v}"))
            })?;
        }

        // Logging
        if let Some(v) = var("COHERENCE_LOG_LEVEL") {
            self.logging.level = v;
        }
        if let Some(v) = var("COHERENCE_LOG_FORMAT") {
            self.logging.format = v;
        }

        // Metrics
        if let Some(v) = var("COHERENCE_METRICS_CONFIG") {
            self.metrics = MetricsConfig::from_file(v)?;
        }

        Ok(self)
    }

    /// Validate configuration values.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.metrics.validate()?;

        match self.logging.level.as_str() {
            "trace" | "debug" | "info" | "warn" | "error" => {}
            other => {
                return Err(ConfigError::ValidationError(format!(
                    "Invalid log level: {other}"
                )));
            }
        }

        match self.logging.format.as_str() {
            "console" | "json" => {}
            other => {
                return Err(ConfigError::ValidationError(format!(
                    "Invalid log format: {other}"
                )));
            }
        }

        if let Some(path) = &self.storage.path {
            if path.as_os_str().is_empty() {
                return Err(ConfigError::ValidationError(
                    "storage.path must not be empty; omit it to use the default".to_string(),
                ));
            }
        }

        Ok(())
    }
}

/// Configuration errors.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[non_exhaustive]
pub enum ConfigError {
    #[error("IO error: {0}")]
    IoError(String),

    #[error("Parse error: {0}")]
    ParseError(String),

    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("Metrics configuration: {0}")]
    Metrics(#[from] coherence_metrics::ConfigError),
}
