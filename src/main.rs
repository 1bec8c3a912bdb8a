//! Edge gateway (v1)
//!
//! # Architecture Overview
//!
//! ```text
//!                  ┌──────────────────────────────────────────────────────────┐
//!                  │                      INTERFACE GATEWAY                    │
//!   Client Request │  ┌─────────┐   ┌───────────┐   ┌────────────┐            │
//!   ───────────────┼─▶│ access  │──▶│ signature │──▶│ interface  │──┐         │
//!                  │  │  gate   │   │  verifier │   │   authz    │  │         │
//!                  │  └────┬────┘   └─────┬─────┘   └─────┬──────┘  │         │
//!                  │       └──── 403 ─────┴──── 403 ──────┘         ▼         │
//!                  │                                         ┌────────────┐   │
//!                  │                                         │  upstream  │◀──┼──▶ Backend
//!                  │                                         │  forwarder │   │
//!                  │                                         └─────┬──────┘   │
//!   Client Response│  ┌──────────────────────────┐                 │          │
//!   ◀──────────────┼──│ streaming interceptor    │◀────────────────┘          │
//!                  │  │ (count-then-forward)     │──── record usage ──────────┼──▶ Remote
//!                  │  └──────────────────────────┘                            │    Authority
//!                  └──────────────────────────────────────────────────────────┘
//! ```

use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::net::TcpListener;

use interface_gateway::config::{load_config, GatewayConfig};
use interface_gateway::observability::{logging, metrics};
use interface_gateway::{HttpRemoteAuthority, HttpServer, Shutdown};

#[derive(Parser)]
#[command(name = "interface-gateway")]
#[command(about = "Edge gateway that gates and meters backend interfaces", long_about = None)]
struct Cli {
    /// Path to a TOML configuration file. Defaults are used when omitted.
    #[arg(short, long)]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => load_config(path)?,
        None => GatewayConfig::default(),
    };

    logging::init(&config.observability.log_level);
    tracing::info!("interface-gateway v{} starting", env!("CARGO_PKG_VERSION"));

    tracing::info!(
        bind_address = %config.listener.bind_address,
        upstream = %config.upstream.address,
        remote = %config.remote.base_url,
        request_timeout_secs = config.timeouts.request_secs,
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

    let remote = Arc::new(HttpRemoteAuthority::new(&config.remote)?);

    let listener = TcpListener::bind(&config.listener.bind_address).await?;
    tracing::info!(address = %listener.local_addr()?, "Listening for connections");

    let shutdown = Shutdown::new();
    let server = HttpServer::new(config, remote)?;
    server.run(listener, shutdown.subscribe()).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
