//! InsightDocs API gateway binary.

use clap::Parser;
use std::path::PathBuf;
use tokio::net::TcpListener;

use insight_gateway::config::{self, GatewayConfig};
use insight_gateway::lifecycle::{self, Shutdown};
use insight_gateway::observability::{logging, metrics};
use insight_gateway::HttpServer;

#[derive(Debug, Parser)]
#[command(
    name = "insight-gateway",
    version,
    about = "API gateway for the InsightDocs document processing pipeline"
)]
struct Cli {
    /// Path to a TOML configuration file. Environment variables override
    /// file values; with no file, defaults plus the environment are used.
    #[arg(long, short)]
    config: Option<PathBuf>,

    /// Override the listener bind address.
    #[arg(long)]
    bind: Option<String>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let mut config: GatewayConfig = match &cli.config {
        Some(path) => config::load_config(path)?,
        None => config::from_env()?,
    };
    if let Some(bind) = cli.bind {
        config.listener.bind_address = bind;
    }

    logging::init_tracing(&config.observability.log_level);

    tracing::info!(
        version = env!("CARGO_PKG_VERSION"),
        bind_address = %config.listener.bind_address,
        default_timeout_secs = config.timeouts.default_secs,
        "insight-gateway starting"
    );

    if config.observability.metrics_enabled {
        match config.observability.metrics_address.parse() {
            Ok(addr) => metrics::init_metrics(addr),
            Err(_) => tracing::error!(
                metrics_address = %config.observability.metrics_address,
                "Failed to parse metrics address"
            ),
        }
    }

    let listener = TcpListener::bind(&config.listener.bind_address).await?;
    tracing::info!(address = %listener.local_addr()?, "Listening for connections");

    let shutdown = Shutdown::new();
    let server_shutdown = shutdown.subscribe();
    tokio::spawn(async move {
        lifecycle::wait_for_signal().await;
        shutdown.trigger();
    });

    let server = HttpServer::new(config)?;
    server.run(listener, server_shutdown).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
