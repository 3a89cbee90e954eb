//! Pothole Report Server - Main Entry Point

use api::{config::AppConfig, init_logging, run_server};
use tracing::info;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = AppConfig::load()?;
    init_logging(&config.logging)?;

    info!("=== Pothole Report Server v{} ===", env!("CARGO_PKG_VERSION"));

    run_server(config).await?;

    Ok(())
}
