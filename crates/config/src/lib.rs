//! Configuration loading, validation, and management for WifiSpot.
//!
//! Loads configuration from `~/.wifispot/config.toml` with environment
//! variable overrides. Validates all settings at startup.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// The root configuration structure.
///
/// Maps directly to `~/.wifispot/config.toml`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Reference dataset (feature schema source)
    #[serde(default)]
    pub dataset: DatasetConfig,

    /// Trained classifier artifact
    #[serde(default)]
    pub model: ModelConfig,

    /// Result export settings
    #[serde(default)]
    pub export: ExportConfig,

    /// Gateway configuration
    #[serde(default)]
    pub gateway: GatewayConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatasetConfig {
    /// CSV whose header defines the feature order
    #[serde(default = "default_dataset_path")]
    pub path: PathBuf,

    /// Column holding the spot label; excluded from the schema
    #[serde(default = "default_label_column")]
    pub label_column: String,

    /// How many leading features can be entered by hand
    #[serde(default = "default_manual_features")]
    pub manual_features: usize,

    /// Field separator of the reference dataset
    #[serde(default = "default_delimiter")]
    pub delimiter: String,
}

fn default_dataset_path() -> PathBuf {
    PathBuf::from("dataset_model.csv")
}
fn default_label_column() -> String {
    "spot".into()
}
fn default_manual_features() -> usize {
    5
}

impl Default for DatasetConfig {
    fn default() -> Self {
        Self {
            path: default_dataset_path(),
            label_column: default_label_column(),
            manual_features: default_manual_features(),
            delimiter: default_delimiter(),
        }
    }
}

impl DatasetConfig {
    /// The delimiter as a single byte (validated at load time).
    pub fn delimiter_byte(&self) -> u8 {
        first_byte(&self.delimiter)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelConfig {
    /// Serialized classifier artifact
    #[serde(default = "default_model_path")]
    pub path: PathBuf,

    /// "auto", "random_forest" or "nearest_centroid"
    #[serde(default = "default_model_kind")]
    pub kind: String,
}

fn default_model_path() -> PathBuf {
    PathBuf::from("rf_model.json")
}
fn default_model_kind() -> String {
    "auto".into()
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            path: default_model_path(),
            kind: default_model_kind(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExportConfig {
    /// Header of the appended prediction column
    #[serde(default = "default_prediction_column")]
    pub prediction_column: String,

    /// Field separator for uploaded and exported tables
    #[serde(default = "default_delimiter")]
    pub delimiter: String,
}

fn default_prediction_column() -> String {
    "Predicted Spot".into()
}
fn default_delimiter() -> String {
    ",".into()
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            prediction_column: default_prediction_column(),
            delimiter: default_delimiter(),
        }
    }
}

impl ExportConfig {
    /// The delimiter as a single byte (validated at load time).
    pub fn delimiter_byte(&self) -> u8 {
        first_byte(&self.delimiter)
    }
}

fn first_byte(delimiter: &str) -> u8 {
    delimiter.as_bytes().first().copied().unwrap_or(b',')
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GatewayConfig {
    #[serde(default = "default_port")]
    pub port: u16,

    #[serde(default = "default_host")]
    pub host: String,

    /// Largest accepted upload body in bytes
    #[serde(default = "default_max_upload_bytes")]
    pub max_upload_bytes: usize,
}

fn default_port() -> u16 {
    8501
}
fn default_host() -> String {
    "127.0.0.1".into()
}
fn default_max_upload_bytes() -> usize {
    10 * 1024 * 1024
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            port: default_port(),
            host: default_host(),
            max_upload_bytes: default_max_upload_bytes(),
        }
    }
}

impl AppConfig {
    /// Load configuration from the default location.
    pub fn load() -> Result<Self, ConfigError> {
        let config_path = Self::config_dir().join("config.toml");
        Self::load_with_env(&config_path)
    }

    /// Load from `path`, then apply environment overrides and validate.
    pub fn load_with_env(path: &Path) -> Result<Self, ConfigError> {
        let mut config = Self::read_file(path)?;

        // Environment variable overrides (highest priority)
        if let Ok(dataset) = std::env::var("WIFISPOT_DATASET") {
            config.dataset.path = PathBuf::from(dataset);
        }
        if let Ok(model) = std::env::var("WIFISPOT_MODEL") {
            config.model.path = PathBuf::from(model);
        }
        if let Ok(port) = std::env::var("WIFISPOT_PORT") {
            config.gateway.port = port.parse().map_err(|_| {
                ConfigError::ValidationError(format!("WIFISPOT_PORT is not a port number: {port}"))
            })?;
        }

        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a specific file path, without env overrides.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let config = Self::read_file(path)?;
        config.validate()?;
        Ok(config)
    }

    fn read_file(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            tracing::info!("No config file found at {}, using defaults", path.display());
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

        toml::from_str(&content).map_err(|e| ConfigError::ParseError {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })
    }

    /// Get the config directory path.
    pub fn config_dir() -> PathBuf {
        dirs_home().join(".wifispot")
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.dataset.manual_features == 0 {
            return Err(ConfigError::ValidationError(
                "dataset.manual_features must be at least 1".into(),
            ));
        }

        if self.dataset.label_column.trim().is_empty() {
            return Err(ConfigError::ValidationError(
                "dataset.label_column must not be empty".into(),
            ));
        }

        if self.export.prediction_column.trim().is_empty() {
            return Err(ConfigError::ValidationError(
                "export.prediction_column must not be empty".into(),
            ));
        }

        check_delimiter("dataset.delimiter", &self.dataset.delimiter)?;
        check_delimiter("export.delimiter", &self.export.delimiter)?;

        if self.gateway.max_upload_bytes == 0 {
            return Err(ConfigError::ValidationError(
                "gateway.max_upload_bytes must be > 0".into(),
            ));
        }

        Ok(())
    }

    /// Generate a default config TOML string (for the `init` command).
    pub fn default_toml() -> String {
        let config = Self::default();
        toml::to_string_pretty(&config).unwrap_or_default()
    }
}

fn check_delimiter(field: &str, delimiter: &str) -> Result<(), ConfigError> {
    let bytes = delimiter.as_bytes();
    if bytes.len() != 1 || !bytes[0].is_ascii() || bytes[0] == b'"' {
        return Err(ConfigError::ValidationError(format!(
            "{field} must be a single ASCII character, got {delimiter:?}"
        )));
    }
    Ok(())
}

/// Get the user's home directory.
fn dirs_home() -> PathBuf {
    #[cfg(target_os = "windows")]
    {
        std::env::var("USERPROFILE")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("C:\\Users\\Default"))
    }
    #[cfg(not(target_os = "windows"))]
    {
        std::env::var("HOME")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("/tmp"))
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file at {path}: {reason}")]
    ReadError { path: PathBuf, reason: String },

    #[error("Failed to parse config file at {path}: {reason}")]
    ParseError { path: PathBuf, reason: String },

    #[error("Configuration validation failed: {0}")]
    ValidationError(String),
}

impl From<ConfigError> for wifispot_core::Error {
    fn from(err: ConfigError) -> Self {
        wifispot_core::Error::Config {
            message: err.to_string(),
        }
    }
}
