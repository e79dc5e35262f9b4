use clap::Parser;
use common::config::Config;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

use crate::{fulfillment::Fulfillment, model::GenericError, storage::MongoOrderRepository};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Path to config file; without one, settings come from ORDER_DB_* variables only
    #[arg(short, long)]
    pub config: Option<String>,
}

pub fn initialize_executable() -> Result<Config, GenericError> {
    // A missing .env file is fine
    dotenvy::dotenv().ok();

    let args = Args::parse();
    let config = match &args.config {
        Some(path) => Config::load_with_env(path)?,
        None => {
            let mut config = Config::default();
            config.order_db.apply_env();
            config
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(&config.worker.log_level)),
        )
        .init();

    tracing::info!(config_path = ?args.config, config = ?config, "loaded config");
    Ok(config)
}

pub async fn run_fulfillment(config: Config) -> Result<(), GenericError> {
    let repository = MongoOrderRepository::connect(&config.order_db).await?;
    let fulfillment = Fulfillment::new(Arc::new(repository), config.worker);

    fulfillment
        .run(async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                tracing::error!(error = %e, "failed to listen for shutdown signal");
            }
        })
        .await;

    Ok(())
}
