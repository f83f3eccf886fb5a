//! Subdomain reverse proxy.
//!
//! # Architecture Overview
//!
//! ```text
//!     Client Request                ┌───────────────────────────────────────────┐
//!     Host: web-3000.example.com    │              SUBDOMAIN PROXY              │
//!     ──────────────────────────────┼─▶ http::server ──▶ routing::host          │
//!                                   │                      │ (web, 3000)        │
//!                                   │                      ▼                    │
//!                                   │                  routing::backend         │
//!                                   │                      │ http://web:3000    │
//!                                   │                      ▼                    │
//!     Client Response (200)         │                  http::forward ───────────┼──▶ Backend
//!     ◀─────────────────────────────┼── http::response ◀───┘                    │    web:3000
//!                                   └───────────────────────────────────────────┘
//! ```

use std::path::PathBuf;

use clap::Parser;
use tokio::net::TcpListener;

use subdomain_proxy::config::load_config;
use subdomain_proxy::lifecycle::{signals, Shutdown};
use subdomain_proxy::observability::{logging, metrics};
use subdomain_proxy::HttpServer;

#[derive(Parser)]
#[command(name = "subdomain-proxy")]
#[command(about = "Reverse proxy routing requests by subdomain", long_about = None)]
struct Args {
    /// Optional TOML configuration file. `PORT` overrides the listener port.
    #[arg(short, long)]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();
    let config = load_config(args.config.as_deref())?;

    logging::init(&config.observability);

    tracing::info!("subdomain-proxy v{} starting", env!("CARGO_PKG_VERSION"));
    tracing::info!(
        bind_address = %config.listener.bind_address(),
        pool_idle_timeout_secs = config.client.pool_idle_timeout_secs,
        "Configuration loaded"
    );

    if config.observability.metrics_enabled {
        // Validated at load time.
        let addr = config.observability.metrics_address.parse()?;
        metrics::init_metrics(addr);
    }

    let listener = TcpListener::bind(config.listener.bind_address()).await?;
    tracing::info!(
        address = %listener.local_addr()?,
        "Listening for connections"
    );

    let shutdown = Shutdown::new();
    let server_shutdown = shutdown.signalled();
    tokio::spawn(async move {
        signals::wait_for_signal().await;
        shutdown.trigger();
    });

    HttpServer::new(&config).run(listener, server_shutdown).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
