//! Startup orchestration.
//!
//! # Responsibilities
//! - Build the endpoint registry from configuration
//! - Start background tasks (health prober, metrics, admin API)
//! - Run the throttled dispatch loop in the foreground until shutdown
//!
//! # Design Decisions
//! - Fail fast: a listener that cannot bind is fatal
//! - The prober and the dispatcher each own a transport with their own timeout

use std::net::SocketAddr;
use std::sync::Arc;

use thiserror::Error;
use tokio::net::TcpListener;

use crate::admin;
use crate::config::DispatcherConfig;
use crate::dispatch::Dispatcher;
use crate::health::HealthProber;
use crate::http::HttpTransport;
use crate::lifecycle::Shutdown;
use crate::load_balancer::Registry;
use crate::observability::metrics;

/// Errors that abort startup.
#[derive(Debug, Error)]
pub enum StartupError {
    #[error("invalid {field} '{value}': {source}")]
    InvalidAddress {
        field: &'static str,
        value: String,
        #[source]
        source: std::net::AddrParseError,
    },

    #[error("failed to bind {addr}: {source}")]
    Bind {
        addr: SocketAddr,
        #[source]
        source: std::io::Error,
    },
}

/// A configured balancer, ready to run.
pub struct Balancer {
    config: DispatcherConfig,
    registry: Arc<Registry>,
}

impl Balancer {
    pub fn new(config: DispatcherConfig) -> Self {
        let registry = Arc::new(Registry::new(&config.backends));

        tracing::info!(
            configured = config.backends.len(),
            active = registry.active_len(),
            "Endpoint registry initialized"
        );

        Self { config, registry }
    }

    pub fn registry(&self) -> Arc<Registry> {
        self.registry.clone()
    }

    pub fn config(&self) -> &DispatcherConfig {
        &self.config
    }

    /// Dispatcher bound to this balancer's registry.
    pub fn dispatcher(&self) -> Dispatcher<HttpTransport> {
        let transport = Arc::new(HttpTransport::new(self.config.dispatch.request_timeout()));
        Dispatcher::new(self.registry.clone(), transport)
    }

    /// Health prober bound to this balancer's registry.
    pub fn prober(&self) -> HealthProber<HttpTransport> {
        let transport = Arc::new(HttpTransport::new(self.config.health_check.timeout()));
        HealthProber::new(self.registry.clone(), transport, self.config.health_check.clone())
    }

    /// Run every task until `shutdown` is triggered.
    pub async fn run(self, shutdown: &Shutdown) -> Result<(), StartupError> {
        if self.config.observability.metrics_enabled {
            let addr = parse_addr(
                "observability.metrics_address",
                &self.config.observability.metrics_address,
            )?;
            metrics::init_metrics(addr);
        }

        let admin_task = if self.config.admin.enabled {
            let addr = parse_addr("admin.bind_address", &self.config.admin.bind_address)?;
            let listener = TcpListener::bind(addr)
                .await
                .map_err(|source| StartupError::Bind { addr, source })?;
            let registry = self.registry.clone();
            let signal = shutdown.subscribe();
            Some(tokio::spawn(async move {
                if let Err(e) = admin::serve(listener, registry, signal).await {
                    tracing::error!(error = %e, "Admin API failed");
                }
            }))
        } else {
            None
        };

        let prober_task = tokio::spawn(self.prober().run(shutdown.subscribe()));

        self.dispatcher()
            .run(self.config.dispatch.interval(), shutdown.subscribe())
            .await;

        if let Err(e) = prober_task.await {
            tracing::error!(error = %e, "Health prober task panicked");
        }
        if let Some(task) = admin_task {
            if let Err(e) = task.await {
                tracing::error!(error = %e, "Admin task panicked");
            }
        }

        Ok(())
    }
}

fn parse_addr(field: &'static str, value: &str) -> Result<SocketAddr, StartupError> {
    value.parse().map_err(|source| StartupError::InvalidAddress {
        field,
        value: value.to_string(),
        source,
    })
}
