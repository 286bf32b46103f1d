//! Employee Service
//!
//! # Architecture Overview
//!
//! ```text
//!     Client ──▶ http (axum router, request id, trace, timeout, body limit)
//!                 │
//!                 ├──▶ employees (service → in-memory store)
//!                 │
//!                 └──▶ external gateway ──▶ circuit breaker ──▶ retry loop
//!                                                   │
//!                                                   ▼
//!                                      reqwest transport (connect + read budgets)
//!                                                   │
//!                                                   ▼
//!                                          External Employee Service
//!
//!     Cross-cutting: config (TOML), observability (tracing, Prometheus),
//!                    lifecycle (signals → broadcast shutdown)
//! ```

use clap::Parser;
use std::path::PathBuf;
use tokio::net::TcpListener;

use employee_service::config::{load_config, AppConfig};
use employee_service::lifecycle::{wait_for_shutdown_signal, Shutdown};
use employee_service::observability::{logging, metrics};
use employee_service::HttpServer;

#[derive(Parser)]
#[command(name = "employee-service")]
#[command(about = "Employee API with a resilient external service gateway", long_about = None)]
struct Args {
    /// Path to a TOML config file; built-in defaults when omitted.
    #[arg(short, long)]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();
    let config = match &args.config {
        Some(path) => load_config(path)?,
        None => AppConfig::default(),
    };

    logging::init_logging(&config.observability);

    tracing::info!(
        version = env!("CARGO_PKG_VERSION"),
        bind_address = %config.listener.bind_address,
        external_base_url = %config.external.base_url,
        connect_timeout_ms = config.timeouts.connect_ms,
        response_timeout_ms = config.timeouts.response_ms,
        max_attempts = config.retries.max_attempts,
        failure_rate_threshold = config.circuit_breaker.failure_rate_threshold,
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

    let shutdown = Shutdown::new();
    let server = HttpServer::new(config)?;

    let trigger = shutdown.clone();
    tokio::spawn(async move {
        wait_for_shutdown_signal().await;
        trigger.trigger();
    });

    server.run(listener, shutdown.subscribe()).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
