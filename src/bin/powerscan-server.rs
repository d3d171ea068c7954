use anyhow::Result;
use clap::Parser;
use powerscan::{build_state, load_config, start_server, ServerArgs};
use powerscan_metrics::TracingService;
use tokio::signal;
use tracing::{info, warn};

async fn shutdown_signal() {
    match signal::ctrl_c().await {
        Ok(()) => info!("Received shutdown signal"),
        Err(err) => warn!("Unable to listen for shutdown signal: {}", err),
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = ServerArgs::parse();
    let config = load_config(&args)?;

    TracingService::init(&config.logging).map_err(|e| anyhow::anyhow!(e))?;
    info!("Starting PowerScan server");
    info!("Configuration loaded: {:?}", config);

    let state = build_state(config)?;
    start_server(state, shutdown_signal())
        .await
        .map_err(|e| anyhow::anyhow!(e))?;

    info!("PowerScan server shutdown complete");
    Ok(())
}
