//! `wifispot schema`: show the feature layout uploads must follow.

use std::path::Path;

use wifispot_pipeline::load_schema;

pub async fn run(config_path: &Path) -> Result<(), Box<dyn std::error::Error>> {
    let config = super::load_config(config_path)?;
    let schema = load_schema(
        &config.dataset.path,
        config.dataset.delimiter_byte(),
        &config.dataset.label_column,
        config.dataset.manual_features,
    )?;

    println!("📶 Feature Schema");
    println!("=================");
    println!("  Dataset:      {}", config.dataset.path.display());
    println!("  Features:     {}", schema.len());
    println!("  Fingerprint:  {}", schema.fingerprint());
    println!("  Label column: {} (excluded)", schema.label_column());
    println!("  Manual entry: {}", schema.manual_features().join(", "));

    println!("\n  Upload files need exactly these columns (any order, no '{}'):", schema.label_column());
    println!("  {}", schema.names().join(&config.export.delimiter));
    println!("  Every value must be an RSSI reading between -100 and 0.");

    Ok(())
}
