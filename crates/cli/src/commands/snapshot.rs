//! `wifispot snapshot`: predict from a simulated scan.

use std::io::Write;
use std::path::Path;

use wifispot_core::{AcquisitionMode, FeatureSchema, SinglePrediction};

pub async fn run(config_path: &Path) -> Result<(), Box<dyn std::error::Error>> {
    let pipeline = super::load_pipeline(config_path)?;

    println!("⚠️  Simulated snapshot: these readings are random, not a real WiFi scan.\n");

    let single = pipeline
        .run(AcquisitionMode::Snapshot)?
        .into_single()
        .ok_or("snapshot mode did not produce a single prediction")?;
    print_readings(&single, pipeline.schema(), &mut std::io::stdout())?;

    println!("\n📌 Predicted spot from snapshot: {}", single.spot);

    Ok(())
}

/// One line per feature, in schema order.
fn print_readings(
    single: &SinglePrediction,
    schema: &FeatureSchema,
    out: &mut impl Write,
) -> std::io::Result<()> {
    for (name, value) in single.observation.labeled(schema) {
        writeln!(out, "   {name:<12} {value}")?;
    }
    Ok(())
}
