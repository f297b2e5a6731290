//! `wifispot serve`: start the HTTP API server.

use std::path::Path;

pub async fn run(
    config_path: &Path,
    port_override: Option<u16>,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut config = super::load_config(config_path)?;

    if let Some(port) = port_override {
        config.gateway.port = port;
    }

    println!("📶 WifiSpot Gateway");
    println!("   Listening: {}:{}", config.gateway.host, config.gateway.port);
    println!("   Dataset:   {}", config.dataset.path.display());
    println!("   Model:     {}", config.model.path.display());

    wifispot_gateway::start(config).await?;

    Ok(())
}
