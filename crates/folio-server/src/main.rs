//! Portfolio chat API server

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use folio_server::ServerConfig;
use tracing::info;

/// Command-line arguments
#[derive(Parser, Debug)]
#[command(name = "folio-server")]
#[command(about = "Portfolio chat API with input moderation", version)]
struct Args {
    /// TOML configuration file
    #[arg(short, long, env = "FOLIO_CONFIG")]
    config: Option<PathBuf>,

    /// Port to listen on (overrides config and PORT)
    #[arg(short, long)]
    port: Option<u16>,

    /// Address to bind
    #[arg(long)]
    host: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let args = Args::parse();

    let mut config = ServerConfig::load(args.config.as_deref())
        .context("failed to load configuration")?;
    if let Some(port) = args.port {
        config.port = port;
    }
    if let Some(host) = args.host {
        config.host = host;
    }

    info!(
        port = config.port,
        mode = %config.mode,
        config_file = ?args.config,
        "Starting folio-server"
    );

    folio_server::serve(config).await?;
    Ok(())
}
