//! Backend challenge service.
//!
//! # Architecture Overview
//!
//! ```text
//!     Client Request
//!     ──────────────▶ request id → trace → timeout → body limit → rate limit
//!                                                                    │
//!                       ┌────────────────┬───────────────────┬───────┴──────┐
//!                       ▼                ▼                   ▼              ▼
//!                 /unique-array   /external-data          /health   /health/detailed
//!                  array::dedup   ExternalDataService                  HealthProbe
//!                                  │      │      │                   (fan-out ping)
//!                               GraphQL  REST   SOAP
//!                                (TTL cache per adapter)
//!                                        │
//!                                  ErrorClassifier → {"error": ..}
//! ```

use std::net::SocketAddr;
use std::path::PathBuf;

use clap::Parser;
use tokio::net::TcpListener;

use backend_challenge::config::load_config;
use backend_challenge::http::HttpServer;
use backend_challenge::lifecycle::Shutdown;
use backend_challenge::observability::{logging, metrics};

#[derive(Debug, Parser)]
#[command(name = "backend-challenge", version, about = "External data aggregation backend")]
struct Cli {
    /// Path to a TOML config file.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Override the listen address, e.g. 127.0.0.1:8080.
    #[arg(short, long)]
    bind: Option<String>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let mut config = load_config(cli.config.as_deref())?;
    if let Some(bind) = cli.bind {
        config.listener.bind_address = bind;
    }

    logging::init(&config.observability)?;

    tracing::info!(version = env!("CARGO_PKG_VERSION"), "backend-challenge starting");
    tracing::info!(
        bind_address = %config.listener.bind_address,
        request_timeout_secs = config.timeouts.request_secs,
        missing_params = ?config.upstream.missing_params,
        rate_limit = config.rate_limit.enabled,
        "Configuration loaded"
    );

    if config.observability.metrics_enabled {
        let addr: SocketAddr = config.observability.metrics_address.parse()?;
        metrics::init_metrics(addr)?;
    }

    let listener = TcpListener::bind(&config.listener.bind_address).await?;
    let local_addr = listener.local_addr()?;
    tracing::info!(address = %local_addr, "Listening for connections");

    let shutdown = Shutdown::new();
    shutdown.trigger_on_signal();

    let server = HttpServer::new(config)?;
    server.run(listener, shutdown.subscribe()).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
