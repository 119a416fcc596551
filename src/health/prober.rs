//! Health probing of removed endpoints.
//!
//! # Responsibilities
//! - Periodically snapshot the removed set
//! - Probe every member with a GET
//! - Reinstate endpoints that answer exactly `200 OK`

use std::sync::Arc;

use axum::http::StatusCode;
use futures_util::future::join_all;
use tokio::time::{self, MissedTickBehavior};

use crate::config::HealthCheckConfig;
use crate::http::Transport;
use crate::lifecycle::ShutdownSignal;
use crate::load_balancer::{Endpoint, Registry};
use crate::observability::metrics;

/// Result of one probe tick.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ProbeReport {
    /// Endpoints probed this tick.
    pub probed: usize,
    /// Endpoints moved back to the active set.
    pub reinstated: Vec<Endpoint>,
}

pub struct HealthProber<T: Transport + ?Sized> {
    registry: Arc<Registry>,
    transport: Arc<T>,
    config: HealthCheckConfig,
}

impl<T: Transport + ?Sized> HealthProber<T> {
    pub fn new(registry: Arc<Registry>, transport: Arc<T>, config: HealthCheckConfig) -> Self {
        Self {
            registry,
            transport,
            config,
        }
    }

    pub async fn run(self, mut shutdown: ShutdownSignal) {
        if !self.config.enabled {
            tracing::info!("Health probing disabled");
            return;
        }

        tracing::info!(interval = self.config.interval_secs, "Health prober starting");

        let interval = self.config.interval();
        // First tick one interval after start, like a sleep-then-check loop.
        let mut ticker = time::interval_at(time::Instant::now() + interval, interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    self.check_removed().await;
                }
                _ = shutdown.recv() => {
                    tracing::info!("Health prober received shutdown signal, exiting loop");
                    break;
                }
            }
        }
    }

    /// Probe every removed endpoint once and reinstate the healthy ones.
    pub async fn check_removed(&self) -> ProbeReport {
        let removed = self.registry.snapshot_removed();
        if removed.is_empty() {
            return ProbeReport::default();
        }

        tracing::debug!(count = removed.len(), "Probing removed endpoints");

        let probes = removed.into_iter().map(|endpoint| async move {
            let healthy = self.probe(&endpoint).await;
            (endpoint, healthy)
        });
        let results = join_all(probes).await;

        let mut report = ProbeReport {
            probed: results.len(),
            reinstated: Vec::new(),
        };

        for (endpoint, healthy) in results {
            metrics::record_probe(healthy);
            if healthy && self.registry.reinstate(&endpoint) {
                tracing::info!(endpoint = %endpoint, "Endpoint reinstated after successful probe");
                metrics::record_reinstatement();
                report.reinstated.push(endpoint);
            }
        }

        report
    }

    async fn probe(&self, endpoint: &Endpoint) -> bool {
        let timeout = self.config.timeout();

        // Bounds transports that do not enforce their own deadline.
        match time::timeout(timeout, self.transport.get(endpoint)).await {
            Ok(Ok(response)) => {
                let status = response.status();
                if status != StatusCode::OK {
                    tracing::debug!(
                        endpoint = %endpoint,
                        status = %status,
                        "Probe failed: non-OK status"
                    );
                }
                status == StatusCode::OK
            }
            Ok(Err(e)) => {
                tracing::debug!(endpoint = %endpoint, error = %e, "Probe failed: request error");
                false
            }
            Err(_) => {
                tracing::debug!(endpoint = %endpoint, timeout = ?timeout, "Probe failed: timeout");
                false
            }
        }
    }
}
