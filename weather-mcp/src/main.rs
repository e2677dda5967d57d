//! Binary crate for the `weather-mcp` server.
//!
//! This crate focuses on:
//! - Parsing CLI arguments and loading configuration
//! - Serving the weather tools over MCP on stdin/stdout
//! - One-shot queries and interactive configuration for local use

use clap::Parser;
use tracing_subscriber::EnvFilter;

mod cli;
mod server;

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    init_tracing();

    let cmd = cli::Cli::parse();
    cmd.run().await
}

/// Logs go to stderr; stdout carries the protocol.
fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "weather_mcp=info,weather_core=info".into()),
        )
        .with_writer(std::io::stderr)
        .init();
}
