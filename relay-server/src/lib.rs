//! relay-server: HTTP entry point for the memory-augmented chat relay.
//!
//! Wires a memory provider (mock, or HTTP-backed when `MEMOBASE_URL` is set)
//! and the OpenAI completion client into [`chat_relay::ChatRelay`], and
//! exposes `POST /api/chat` as a streaming endpoint.

mod assembly;
mod cli;
mod config;
mod routes;

pub use assembly::build_relay;
pub use cli::{Cli, Commands};
pub use config::ServerConfig;
pub use routes::{build_router, cors_layer, AppState};

use anyhow::Result;
use tracing::info;

/// Binds the listener and serves the router until shutdown.
pub async fn run(config: ServerConfig) -> Result<()> {
    let relay = build_relay(&config);
    let cors = routes::cors_layer(config.allowed_origins.as_deref());
    let app = build_router(AppState { relay }, cors);

    let addr = format!("0.0.0.0:{}", config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!(%addr, "Relay server listening");
    axum::serve(listener, app).await?;
    Ok(())
}
