//! tinyircd - a small IRC daemon.

use std::sync::Arc;
use tinyircd::config::Config;
use tinyircd::network::Gateway;
use tinyircd::state::Server;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(true)
        .init();

    // Load configuration
    let config_path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "config.toml".to_string());

    let config = Config::load(&config_path).map_err(|e| {
        error!(path = %config_path, error = %e, "Failed to load config");
        e
    })?;

    info!(
        server = %config.server.name,
        version = %config.server.version,
        "Starting tinyircd"
    );

    let addr = config.listen.address;
    let server = Arc::new(Server::new(config));
    let gateway = Gateway::bind(addr, Arc::clone(&server)).await?;

    tokio::select! {
        result = gateway.run() => result?,
        _ = tokio::signal::ctrl_c() => {
            info!(
                connections = server.connections_total(),
                peak_users = server.peak_users(),
                "Shutting down"
            );
        }
    }

    Ok(())
}
