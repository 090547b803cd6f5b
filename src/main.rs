//! Ninja2 protocol gateway.
//!
//! Speaks the legacy game server's wire protocol so an unmodified client
//! can be pointed at a replacement backend.
//!
//! # Architecture Overview
//!
//! ```text
//!     Client Request
//!     ──────────────▶ http (axum, CORS, request ID, limits)
//!                        │
//!                        ▼
//!                     routing::Dispatcher ──▶ Registry (exact path, else default)
//!                        │
//!                        ▼
//!                     format::Format::decode (NINJA2 / XML / FORM / RAW)
//!                        │                         │
//!                        ▼                         ▼
//!                     handler ◀──── storage     cipher
//!                        │
//!                        ▼
//!                     format::Format::encode, or ErrorEnvelope on failure
//!     Client Response    │
//!     ◀──────────────────┘
//! ```

use std::path::PathBuf;

use clap::Parser;
use tokio::net::TcpListener;

use ninja2_gateway::config::{load_config, GatewayConfig};
use ninja2_gateway::http::HttpServer;
use ninja2_gateway::lifecycle::{bootstrap, wait_for_signal, Shutdown};
use ninja2_gateway::observability::{logging, metrics};
use ninja2_gateway::storage::Storage;

#[derive(Parser)]
#[command(name = "ninja2-gateway")]
#[command(about = "Legacy Ninja2 protocol gateway", long_about = None)]
struct Args {
    /// Path to a TOML config file; defaults are used when omitted.
    #[arg(short, long)]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let config = match &args.config {
        Some(path) => load_config(path)?,
        None => GatewayConfig::default(),
    };

    logging::init_logging(&config.observability);
    tracing::info!("ninja2-gateway v{} starting", env!("CARGO_PKG_VERSION"));

    tracing::info!(
        bind_address = %config.listener.bind_address,
        request_timeout_secs = config.timeouts.request_secs,
        max_body_size = config.security.max_body_size,
        "Configuration loaded"
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

    let dispatcher = bootstrap(&config)?;
    let storage = dispatcher.storage().clone();

    let listener = TcpListener::bind(&config.listener.bind_address).await?;
    tracing::info!(address = %listener.local_addr()?, "Listening for connections");

    let shutdown = Shutdown::new();
    let server = HttpServer::new(&config, dispatcher);
    let server_shutdown = shutdown.subscribe();

    tokio::spawn(async move {
        wait_for_signal().await;
        shutdown.trigger();
    });

    server.run(listener, server_shutdown).await?;

    storage.close()?;
    tracing::info!("Shutdown complete");
    Ok(())
}
