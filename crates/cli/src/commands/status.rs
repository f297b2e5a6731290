//! `wifispot status`: show configuration and artifact status.

use std::path::Path;

use wifispot_pipeline::SpotPipeline;

pub async fn run(config_path: &Path) -> Result<(), Box<dyn std::error::Error>> {
    let config = super::load_config(config_path)?;

    println!("📶 WifiSpot Status");
    println!("==================");
    println!("  Config:       {}", config_path.display());
    println!("  Dataset:      {}", config.dataset.path.display());
    println!("  Label column: {}", config.dataset.label_column);
    println!("  Manual APs:   {}", config.dataset.manual_features);
    println!("  Model:        {} ({})", config.model.path.display(), config.model.kind);
    println!("  Export:       '{}' column, '{}' delimiter", config.export.prediction_column, config.export.delimiter);
    println!("  Gateway:      {}:{}", config.gateway.host, config.gateway.port);

    match SpotPipeline::from_config(&config) {
        Ok(pipeline) => {
            println!("\n  ✅ Pipeline ready");
            println!("     Features:    {}", pipeline.schema().len());
            println!("     Fingerprint: {}", pipeline.schema().fingerprint());
            if let Some(info) = pipeline.model_info() {
                println!("     Classifier:  {}", info.kind);
                println!("     Loaded at:   {}", info.loaded_at.to_rfc3339());
            }
        }
        Err(e) => {
            println!("\n  ❌ Pipeline unavailable: {e}");
            println!("     Run `wifispot doctor` for details.");
        }
    }

    if !config_path.exists() {
        println!("\n  ⚠️  No config file, using defaults. Run `wifispot init` to create one.");
    }

    Ok(())
}
