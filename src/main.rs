//! rr-dispatch
//!
//! Sends a GET to a pool of backends in round-robin order, drops backends
//! that fail at the transport level, and probes dropped backends until they
//! answer `200 OK` again.
//!
//! ```text
//!   dispatch loop (every dispatch.interval_ms)          health prober (every health_check.interval_secs)
//!          │                                                        │
//!          ▼                                                        ▼
//!   registry.next_endpoint() ──▶ GET ──▶ 200: log body      registry.snapshot_removed()
//!          ▲                        │                               │
//!          └── registry.remove() ◀──┘ transport error               ▼
//!                                                           GET each ──▶ 200: registry.reinstate()
//! ```

use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;

use rr_dispatch::config::{self, validation::validate_config, ConfigError, DispatcherConfig};
use rr_dispatch::lifecycle::{signals, Balancer, Shutdown};
use rr_dispatch::observability::logging;

#[derive(Parser)]
#[command(name = "rr-dispatch")]
#[command(
    about = "Round-robin request dispatcher with failover and recovery probing",
    long_about = None
)]
struct Cli {
    /// Path to a TOML configuration file.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Backend URL; repeat to build the pool. Replaces the configured list.
    #[arg(short, long = "backend")]
    backends: Vec<String>,

    /// Override the configured log level.
    #[arg(long)]
    log_level: Option<String>,
}

fn build_config(cli: &Cli) -> Result<DispatcherConfig, ConfigError> {
    let mut config = match &cli.config {
        Some(path) => config::load_config(path)?,
        None => DispatcherConfig::default(),
    };

    if !cli.backends.is_empty() {
        config.backends = cli.backends.clone();
    }
    if let Some(level) = &cli.log_level {
        config.observability.log_level = level.clone();
    }

    validate_config(&config).map_err(ConfigError::Validation)?;
    Ok(config)
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let config = build_config(&cli)?;

    logging::init(&config.observability);

    tracing::info!("rr-dispatch v{} starting", env!("CARGO_PKG_VERSION"));
    tracing::info!(
        backends = config.backends.len(),
        dispatch_interval_ms = config.dispatch.interval_ms,
        probe_interval_secs = config.health_check.interval_secs,
        "Configuration loaded"
    );

    let shutdown = Arc::new(Shutdown::new());
    {
        let shutdown = shutdown.clone();
        tokio::spawn(async move {
            signals::wait_for_signal().await;
            shutdown.trigger();
        });
    }

    Balancer::new(config).run(&shutdown).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
