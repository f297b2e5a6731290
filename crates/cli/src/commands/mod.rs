//! Subcommand implementations.

pub mod config_cmd;
pub mod doctor;
pub mod init;
pub mod manual;
pub mod schema;
pub mod serve;
pub mod snapshot;
pub mod status;
pub mod upload;

use std::path::{Path, PathBuf};

use wifispot_config::AppConfig;
use wifispot_pipeline::SpotPipeline;

/// The config file in effect: `--config` if given, else the default location.
pub fn config_path(explicit: Option<&Path>) -> PathBuf {
    explicit
        .map(Path::to_path_buf)
        .unwrap_or_else(|| AppConfig::config_dir().join("config.toml"))
}

pub fn load_config(path: &Path) -> Result<AppConfig, Box<dyn std::error::Error>> {
    AppConfig::load_with_env(path)
        .map_err(|e| format!("Failed to load config: {e}").into())
}

/// Load config, reference dataset and model. Fails if any artifact is unusable.
pub fn load_pipeline(path: &Path) -> Result<SpotPipeline, Box<dyn std::error::Error>> {
    let config = load_config(path)?;
    tracing::debug!(
        dataset = %config.dataset.path.display(),
        model = %config.model.path.display(),
        "Loading pipeline"
    );
    SpotPipeline::from_config(&config).map_err(|e| {
        format!("{e}\n   Run `wifispot doctor` to diagnose the dataset and model files.").into()
    })
}
