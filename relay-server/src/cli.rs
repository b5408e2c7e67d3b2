//! Command-line interface for the relay server binary.

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "relay-server", about = "Memory-augmented chat relay server")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Start the relay server
    Run {
        /// Port to listen on; overrides the PORT environment variable
        #[arg(long)]
        port: Option<u16>,
    },
}
