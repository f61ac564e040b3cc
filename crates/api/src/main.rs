//! Fleet Scoring Service - Main Entry Point

use api::{init_logging, load_config, run_server, DEFAULT_CONFIG_PATH};
use tracing::info;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config_path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| DEFAULT_CONFIG_PATH.to_string());
    let config = load_config(&config_path)?;
    init_logging(&config.logging)?;

    info!("=== Fleet Scoring v{} ===", env!("CARGO_PKG_VERSION"));
    info!("Starting driver trust scoring service...");

    run_server(config).await
}
