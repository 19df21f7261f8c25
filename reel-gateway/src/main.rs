//! Reel Gateway - Main entry point.

use anyhow::Result;
use reel_common::config::Config;
use reel_common::logging::init_logging;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration
    let config = Config::load_and_validate()?;

    // Initialize logging
    init_logging(&config.observability.log_level, &config.observability.log_format);

    tracing::info!("Reel Gateway v{}", env!("CARGO_PKG_VERSION"));

    // Start the gateway server
    reel_gateway::start_server(&config).await
}
