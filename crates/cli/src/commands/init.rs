//! `wifispot init`: write the default configuration.

use std::path::Path;

use wifispot_config::AppConfig;

pub async fn run(config_path: &Path) -> Result<(), Box<dyn std::error::Error>> {
    println!("📶 WifiSpot: First-Time Setup");
    println!("=============================\n");

    if let Some(config_dir) = config_path.parent() {
        if !config_dir.as_os_str().is_empty() && !config_dir.exists() {
            std::fs::create_dir_all(config_dir)?;
            println!("✅ Created config directory: {}", config_dir.display());
        }
    }

    if config_path.exists() {
        println!("⚠️  Config already exists at: {}", config_path.display());
        println!("   Edit it manually or delete and re-run init.\n");
        return Ok(());
    }

    std::fs::write(config_path, AppConfig::default_toml())?;
    println!("✅ Created config.toml at: {}", config_path.display());
    println!("\n📝 Next steps:");
    println!("   1. Point [dataset].path at the reference dataset CSV");
    println!("   2. Point [model].path at the trained model artifact");
    println!("   3. Run: wifispot doctor\n");

    Ok(())
}
