//! Clacks Overhead demo server.
//!
//! # Architecture Overview
//!
//! ```text
//!     Client Request          ┌──────────────────────────────────────────────┐
//!     (X-Clacks-Overhead) ───▶│ TraceLayer → TimeoutLayer → ClacksLayer      │
//!                             │                                 │            │
//!                             │            ┌────────────────────┴──────┐     │
//!                             │            │ process incoming messages │     │
//!                             │            │  N → not logged           │     │
//!                             │            │  U → turned around        │     │
//!                             │            │  G → relay (send on)      │     │
//!                             │            └────────────────────┬──────┘     │
//!                             │                                 ▼            │
//!                             │                        echo / relay handler  │
//!     Client Response         │                                 │            │
//!     ◀───────────────────────│ defaults + relayed + turned around messages  │
//!                             └──────────────────────────────────────────────┘
//! ```

use std::path::PathBuf;

use clap::Parser;
use tokio::net::TcpListener;

use clacks_overhead::config::{load_config, ServerConfig};
use clacks_overhead::lifecycle::signals::shutdown_signal;
use clacks_overhead::observability::{logging, metrics};
use clacks_overhead::{HttpServer, Shutdown};

#[derive(Parser)]
#[command(name = "clacks-server")]
#[command(about = "HTTP server that keeps the clacks running", long_about = None)]
struct Args {
    /// TOML configuration file.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Override the listener bind address.
    #[arg(short, long)]
    bind: Option<String>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => load_config(path)?,
        None => ServerConfig::default(),
    };
    if let Some(bind) = args.bind {
        config.listener.bind_address = bind;
    }

    logging::init_logging(&config.observability);

    tracing::info!(
        bind_address = %config.listener.bind_address,
        header = %config.clacks.header_name,
        messages = config.clacks.messages.len(),
        relay = config.clacks.relay.enabled,
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

    let listener = TcpListener::bind(&config.listener.bind_address).await?;
    tracing::info!(address = %listener.local_addr()?, "Listening for connections");

    let server = HttpServer::new(config).map_err(|errors| {
        errors
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(", ")
    })?;

    let shutdown = Shutdown::new();
    let signal = shutdown.subscribe();
    tokio::spawn(async move {
        shutdown_signal().await;
        shutdown.trigger();
    });

    server.run(listener, signal).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
