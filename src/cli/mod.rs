use crate::data::configuration::Configuration;
use crate::data::dbconnector::{DBConnection, SQLConnector};
use crate::server;
use clap::Parser;
use log::{debug, info, warn};
use std::path::Path;

#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Overrides `server.port` from the configuration file
    #[arg(short, long)]
    port: Option<u16>,
    #[arg(short, long, default_value_t = String::from("configuration.toml"))]
    configuration_path: String,
}

pub async fn run() -> anyhow::Result<()> {
    let args = Args::parse();

    let config_found = Path::new(&args.configuration_path).exists();
    let mut config = if config_found {
        Configuration::load(&args.configuration_path)?
    } else {
        Configuration::default()
    };
    if let Some(port) = args.port {
        config.server.port = port;
    }

    env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or(config.server.log_level.as_str()),
    )
    .init();

    if !config_found {
        warn!(
            "No configuration at {}, using defaults",
            args.configuration_path
        );
    }
    debug!("Loaded configuration: {config:?}");

    // Check the database connection
    let mut db_connector = SQLConnector::new(&config.database.path);
    db_connector.connect().await?;
    db_connector.check().await?;
    // Has database been initialised ?
    if db_connector.is_initialized().await? {
        info!("Database is initialized");
    } else {
        info!("Database is not initialized, performing initialization");
        db_connector.initialize().await?;
    }

    server::run(config, db_connector).await
}
