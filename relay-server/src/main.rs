//! relay-server entry point.

use anyhow::Result;
use clap::Parser;
use relay_server::{run, Cli, Commands, ServerConfig};

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,relay_server=debug".into()),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Run { port } => {
            let config = ServerConfig::load(port);
            run(config).await
        }
    }
}
