//! `wifispot config`: configuration management commands.

use std::path::Path;

use wifispot_config::AppConfig;

pub async fn validate(config_path: &Path) -> Result<(), Box<dyn std::error::Error>> {
    println!("🔍 Validating configuration...");

    match AppConfig::load_with_env(config_path) {
        Ok(config) => {
            println!("   ✅ Config parsed successfully");

            let mut warnings = Vec::new();

            if !config_path.exists() {
                warnings.push(format!("{} does not exist; defaults in use", config_path.display()));
            }
            if !config.dataset.path.exists() {
                warnings.push(format!(
                    "Reference dataset not found: {}",
                    config.dataset.path.display()
                ));
            }
            if !config.model.path.exists() {
                warnings.push(format!("Model artifact not found: {}", config.model.path.display()));
            }
            if config.gateway.host == "0.0.0.0" {
                warnings.push("Gateway bound to 0.0.0.0 (reachable from the network)".into());
            }

            if warnings.is_empty() {
                println!("   ✅ All checks passed");
            } else {
                println!();
                for w in &warnings {
                    println!("   ⚠️  {w}");
                }
            }

            println!();
            println!("   Dataset:  {}", config.dataset.path.display());
            println!("   Model:    {} ({})", config.model.path.display(), config.model.kind);
            println!("   Manual:   {} access points", config.dataset.manual_features);
            println!(
                "   Gateway:  {}:{}",
                config.gateway.host, config.gateway.port
            );
        }
        Err(e) => {
            println!("   ❌ Config error: {e}");
            return Err(e.into());
        }
    }

    Ok(())
}

pub async fn show(config_path: &Path) -> Result<(), Box<dyn std::error::Error>> {
    let config = super::load_config(config_path)?;
    let toml_str = toml::to_string_pretty(&config)?;
    println!("{toml_str}");
    Ok(())
}

pub async fn path(config_path: &Path) -> Result<(), Box<dyn std::error::Error>> {
    println!("{}", config_path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_renders_as_toml() {
        let rendered = toml::to_string_pretty(&AppConfig::default()).unwrap();
        assert!(rendered.contains("[dataset]"));
        assert!(rendered.contains("prediction_column = \"Predicted Spot\""));
    }

    #[tokio::test]
    async fn validate_rejects_bad_delimiter() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[export]\ndelimiter = \";;\"\n").unwrap();
        assert!(validate(&path).await.is_err());
    }
}
