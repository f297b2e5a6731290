//! WifiSpot CLI: the main entry point.
//!
//! Commands:
//! - `init`     Write the default config
//! - `manual`   Predict from hand-entered readings
//! - `upload`   Predict every row of a CSV file
//! - `snapshot` Predict from a simulated scan
//! - `schema`   Show the feature layout
//! - `serve`    Start the HTTP gateway
//! - `status`   Show configuration and loaded artifacts
//! - `doctor`   Diagnose dataset and model problems

use std::path::PathBuf;

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(
    name = "wifispot",
    about = "WifiSpot: predict a location from WiFi RSSI readings",
    version,
    author
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Emit logs as JSON lines
    #[arg(long, global = true)]
    json_logs: bool,

    /// Config file to use instead of ~/.wifispot/config.toml
    #[arg(short, long, global = true, env = "WIFISPOT_CONFIG")]
    config: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Write the default configuration file
    Init,

    /// Predict a spot from hand-entered readings for the manual-entry access points
    Manual {
        /// A reading as NAME=VALUE (repeatable); omitted access points are prompted for
        #[arg(long = "ap", value_name = "NAME=VALUE", value_parser = commands::manual::parse_reading)]
        readings: Vec<(String, f64)>,
    },

    /// Predict a spot for every row of a CSV file
    Upload {
        /// CSV file with one column per access point
        input: PathBuf,

        /// Where to write the augmented table ("-" for stdout)
        #[arg(short, long, default_value = wifispot_pipeline::EXPORT_FILE_NAME)]
        output: PathBuf,
    },

    /// Predict a spot from a simulated WiFi scan
    Snapshot,

    /// Show the feature schema
    Schema,

    /// Start the HTTP gateway server
    Serve {
        /// Override the port
        #[arg(short, long)]
        port: Option<u16>,
    },

    /// Show configuration and artifact status
    Status,

    /// Diagnose dataset, model, and configuration problems
    Doctor,

    /// Configuration management
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand)]
enum ConfigAction {
    /// Check that the config file parses and validates
    Validate,
    /// Print the effective configuration as TOML
    Show,
    /// Print the config file path
    Path,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // Initialize tracing
    let filter = if cli.verbose { "debug" } else { "info" };
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(filter));
    if cli.json_logs {
        tracing_subscriber::fmt()
            .json()
            .with_env_filter(env_filter)
            .with_writer(std::io::stderr)
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(env_filter)
            .with_target(false)
            .with_writer(std::io::stderr)
            .init();
    }

    let config_path = commands::config_path(cli.config.as_deref());

    match cli.command {
        Commands::Init => commands::init::run(&config_path).await?,
        Commands::Manual { readings } => commands::manual::run(&config_path, readings).await?,
        Commands::Upload { input, output } => {
            commands::upload::run(&config_path, &input, &output).await?
        }
        Commands::Snapshot => commands::snapshot::run(&config_path).await?,
        Commands::Schema => commands::schema::run(&config_path).await?,
        Commands::Serve { port } => commands::serve::run(&config_path, port).await?,
        Commands::Status => commands::status::run(&config_path).await?,
        Commands::Doctor => commands::doctor::run(&config_path).await?,
        Commands::Config { action } => match action {
            ConfigAction::Validate => commands::config_cmd::validate(&config_path).await?,
            ConfigAction::Show => commands::config_cmd::show(&config_path).await?,
            ConfigAction::Path => commands::config_cmd::path(&config_path).await?,
        },
    }

    Ok(())
}
