//! Hexlay puzzle server.

use anyhow::Context;
use hexlay_core::GameConfig;
use std::net::SocketAddr;
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod protocol;
mod server;
mod session;

use server::ServerState;

/// Read the game config named by `HEXLAY_CONFIG`, or use the defaults
fn load_config() -> anyhow::Result<GameConfig> {
    let Ok(path) = std::env::var("HEXLAY_CONFIG") else {
        return Ok(GameConfig::default());
    };
    let json = std::fs::read_to_string(&path)
        .with_context(|| format!("reading config file {}", path))?;
    let config = GameConfig::from_json_str(&json)
        .with_context(|| format!("parsing config file {}", path))?;
    info!("Loaded game config from {}", path);
    Ok(config)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Parse address from env or use default
    let addr: SocketAddr = std::env::var("SERVER_ADDR")
        .unwrap_or_else(|_| "0.0.0.0:8080".into())
        .parse()?;

    info!("Starting Hexlay server...");

    let config = load_config()?;
    let state = Arc::new(ServerState::new(config));

    server::run_server(addr, state).await
}
