//! Backup report service.
//!
//! # Architecture Overview
//!
//! ```text
//!                   ┌───────────────────────────────────────────────────────┐
//!                   │                  BACKUP REPORT SERVICE                │
//!                   │                                                       │
//!  GET /domains/    │  ┌─────────┐    ┌──────────────┐    ┌─────────────┐   │
//!  {id}/report  ────┼─▶│  http   │───▶│    report    │───▶│   storage   │   │
//!                   │  │ server  │    │ orchestrator │    │ (user page) │   │
//!                   │  └─────────┘    └──────┬───────┘    └─────────────┘   │
//!                   │                        │                              │
//!                   │                        ▼                              │
//!                   │                ┌──────────────┐     ┌─────────────┐   │
//!                   │                │   circuit    │────▶│   license   │───┼──▶ License
//!                   │                │   breaker    │     │    lease    │   │    Service
//!                   │                └──────────────┘     └─────────────┘   │
//!                   │                                                       │
//!                   │  config · observability · lifecycle                  │
//!                   └───────────────────────────────────────────────────────┘
//! ```

use std::path::PathBuf;

use clap::Parser;
use tokio::net::TcpListener;

use backup_report::config::{load_config, ReportServiceConfig};
use backup_report::lifecycle::{build_orchestrator, Shutdown};
use backup_report::observability::{logging, metrics};
use backup_report::HttpServer;

#[derive(Parser)]
#[command(name = "backup-report")]
#[command(about = "Domain backup and license status report service", long_about = None)]
struct Args {
    /// Path to the TOML configuration file. Defaults apply when omitted.
    #[arg(short, long)]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let config = match &args.config {
        Some(path) => load_config(path)?,
        None => ReportServiceConfig::default(),
    };

    logging::init(&config.observability);
    tracing::info!("backup-report v{} starting", env!("CARGO_PKG_VERSION"));
    tracing::info!(
        bind_address = %config.listener.bind_address,
        config_file = ?args.config,
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

    let orchestrator = build_orchestrator(&config)?;

    let listener = TcpListener::bind(&config.listener.bind_address).await?;
    tracing::info!(address = %listener.local_addr()?, "Listening for connections");

    let shutdown = Shutdown::new();
    let server = HttpServer::new(&config, orchestrator);
    let mut server_task = tokio::spawn(server.run(listener, shutdown.subscribe()));

    let finished = tokio::select! {
        signal = tokio::signal::ctrl_c() => {
            match signal {
                Ok(()) => {
                    tracing::info!("Ctrl+C received, draining in-flight requests");
                    shutdown.trigger();
                }
                Err(e) => tracing::error!(error = %e, "Failed to listen for Ctrl+C"),
            }
            None
        }
        result = &mut server_task => Some(result),
    };
    let result = match finished {
        Some(result) => result,
        None => server_task.await,
    };
    result??;

    tracing::info!("Shutdown complete");
    Ok(())
}
