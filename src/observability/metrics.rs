//! Metrics collection and exposition.
//!
//! # Metrics
//! - `dispatch_requests_total` (counter): dispatch attempts by `outcome`
//! - `dispatch_endpoint_removals_total` (counter): active → removed moves
//! - `health_probes_total` (counter): probes by `result`
//! - `health_endpoint_reinstatements_total` (counter): removed → active moves
//! - `registry_active_endpoints` / `registry_removed_endpoints` (gauges)
//!
//! Without an installed recorder every call here is a no-op.

use std::net::SocketAddr;

use metrics::{counter, gauge};
use metrics_exporter_prometheus::PrometheusBuilder;

/// Install the Prometheus recorder and its scrape endpoint.
///
/// Must be called from within a Tokio runtime.
pub fn init_metrics(addr: SocketAddr) {
    match PrometheusBuilder::new().with_http_listener(addr).install() {
        Ok(()) => tracing::info!(address = %addr, "Metrics endpoint listening"),
        Err(e) => {
            tracing::error!(address = %addr, error = %e, "Failed to install metrics recorder")
        }
    }
}

pub fn record_dispatch(outcome: &'static str) {
    counter!("dispatch_requests_total", "outcome" => outcome).increment(1);
}

pub fn record_removal() {
    counter!("dispatch_endpoint_removals_total").increment(1);
}

pub fn record_probe(healthy: bool) {
    let result = if healthy { "healthy" } else { "unhealthy" };
    counter!("health_probes_total", "result" => result).increment(1);
}

pub fn record_reinstatement() {
    counter!("health_endpoint_reinstatements_total").increment(1);
}

pub fn record_registry_sizes(active: usize, removed: usize) {
    gauge!("registry_active_endpoints").set(active as f64);
    gauge!("registry_removed_endpoints").set(removed as f64);
}
