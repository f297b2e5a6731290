//! `wifispot doctor`: diagnose dataset, model, and configuration problems.

use std::path::Path;

use wifispot_config::AppConfig;
use wifispot_models::{ensure_aligned, load_model};
use wifispot_pipeline::load_schema;

pub async fn run(config_path: &Path) -> Result<(), Box<dyn std::error::Error>> {
    println!("🩺 WifiSpot Doctor: Startup Diagnostics");
    println!("=======================================\n");

    let issues = diagnose(config_path, &mut std::io::stdout())?;

    println!();
    if issues == 0 {
        println!("  🎉 All checks passed!");
        Ok(())
    } else {
        println!("  ⚠️  {issues} issue(s) found. See above for details.");
        Err(format!("doctor found {issues} issue(s)").into())
    }
}

/// Run every check, writing one line per result. Returns the issue count.
fn diagnose(config_path: &Path, out: &mut impl std::io::Write) -> std::io::Result<usize> {
    let mut issues = 0;

    let config = if config_path.exists() {
        match AppConfig::load_with_env(config_path) {
            Ok(config) => {
                writeln!(out, "  ✅ Config file valid")?;
                config
            }
            Err(e) => {
                writeln!(out, "  ❌ Config file invalid: {e}")?;
                return Ok(issues + 1);
            }
        }
    } else {
        writeln!(out, "  ⚠️  No config file, using defaults (run `wifispot init`)")?;
        match AppConfig::load_with_env(config_path) {
            Ok(config) => config,
            Err(e) => {
                writeln!(out, "  ❌ Environment overrides invalid: {e}")?;
                return Ok(issues + 1);
            }
        }
    };

    let schema = match load_schema(
        &config.dataset.path,
        config.dataset.delimiter_byte(),
        &config.dataset.label_column,
        config.dataset.manual_features,
    ) {
        Ok(schema) => {
            writeln!(
                out,
                "  ✅ Reference dataset: {} features (fingerprint {})",
                schema.len(),
                schema.fingerprint()
            )?;
            Some(schema)
        }
        Err(e) => {
            writeln!(out, "  ❌ Reference dataset: {e}")?;
            issues += 1;
            None
        }
    };

    let model = match load_model(&config.model.path, &config.model.kind) {
        Ok(model) => {
            writeln!(
                out,
                "  ✅ Model artifact: {} over {} features",
                model.info.kind, model.info.n_features
            )?;
            Some(model)
        }
        Err(e) => {
            writeln!(out, "  ❌ Model artifact: {e}")?;
            issues += 1;
            None
        }
    };

    if let (Some(schema), Some(model)) = (&schema, &model) {
        match ensure_aligned(model.classifier.as_ref(), schema) {
            Ok(()) => writeln!(out, "  ✅ Model features match the dataset")?,
            Err(e) => {
                writeln!(out, "  ❌ {e}")?;
                issues += 1;
            }
        }
    }

    Ok(issues)
}
