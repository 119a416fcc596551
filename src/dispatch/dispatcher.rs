//! Request dispatcher.
//!
//! # State Machine
//! ```text
//! SELECTING ──(none active)──────────────▶ NO_SERVERS
//!     │
//!     ▼
//! REQUESTING ──(transport failure)──▶ remove endpoint ──▶ SELECTING
//!     │
//!     ├──(status != 200)──▶ NON_SUCCESS_STATUS   (endpoint kept)
//!     └──(status == 200)──▶ read body ──▶ SUCCESS | BODY_READ_ERROR
//!                                              | BODY_TIMEOUT
//! ```
//!
//! The transport's timeout covers one attempt end to end: the response
//! headers are bounded by the transport, the body read by the remainder.
//!
//! Transport failures retry immediately against the next endpoint, with no
//! backoff and no attempt cap. Each failure shrinks the active set, so the
//! loop ends once every endpoint has been removed, unless the prober
//! reinstates endpoints concurrently.

use std::sync::Arc;
use std::time::Duration;

use axum::body::Bytes;
use axum::http::StatusCode;
use tokio::time;
use tracing::Instrument;
use uuid::Uuid;

use crate::dispatch::DispatchError;
use crate::http::Transport;
use crate::lifecycle::ShutdownSignal;
use crate::load_balancer::{Endpoint, Registry};
use crate::observability::metrics;

/// Upper bound on a buffered response body.
pub const MAX_BODY_BYTES: usize = 10 * 1024 * 1024;

/// A completed dispatch.
#[derive(Debug, Clone)]
pub struct DispatchResponse {
    /// Endpoint that produced the response.
    pub endpoint: Endpoint,
    /// Full response body.
    pub body: Bytes,
    /// Endpoints tried, including the successful one.
    pub attempts: u32,
}

/// Sends requests to the registry's endpoints in round-robin order.
pub struct Dispatcher<T: Transport + ?Sized> {
    registry: Arc<Registry>,
    transport: Arc<T>,
}

impl<T: Transport + ?Sized> Clone for Dispatcher<T> {
    fn clone(&self) -> Self {
        Self {
            registry: self.registry.clone(),
            transport: self.transport.clone(),
        }
    }
}

impl<T: Transport + ?Sized> Dispatcher<T> {
    pub fn new(registry: Arc<Registry>, transport: Arc<T>) -> Self {
        Self { registry, transport }
    }

    pub fn registry(&self) -> &Arc<Registry> {
        &self.registry
    }

    /// Perform one logical request.
    pub async fn dispatch(&self) -> Result<DispatchResponse, DispatchError> {
        let dispatch_id = Uuid::new_v4();
        let result = self
            .dispatch_inner()
            .instrument(tracing::info_span!("dispatch", %dispatch_id))
            .await;

        metrics::record_dispatch(match &result {
            Ok(_) => "success",
            Err(e) => e.outcome(),
        });
        result
    }

    async fn dispatch_inner(&self) -> Result<DispatchResponse, DispatchError> {
        let mut attempts = 0u32;

        loop {
            let Some(endpoint) = self.registry.next_endpoint() else {
                tracing::warn!(attempts, "No active servers available");
                return Err(DispatchError::NoActiveServers);
            };
            attempts += 1;
            let timeout = self.transport.timeout();
            let deadline = time::Instant::now() + timeout;

            let response = match self.transport.get(&endpoint).await {
                Ok(response) => response,
                Err(e) if e.is_transport_failure() => {
                    tracing::warn!(
                        endpoint = %endpoint,
                        attempt = attempts,
                        error = %e,
                        "Error making request, removing endpoint"
                    );
                    if self.registry.remove(&endpoint) {
                        metrics::record_removal();
                    }
                    continue;
                }
                Err(e) => {
                    tracing::error!(endpoint = %endpoint, error = %e, "Error creating request");
                    return Err(DispatchError::InvalidRequest { endpoint, source: e });
                }
            };

            let status = response.status();
            if status != StatusCode::OK {
                tracing::warn!(endpoint = %endpoint, status = %status, "Non-success response");
                return Err(DispatchError::NonSuccessStatus { endpoint, status });
            }

            let body = axum::body::to_bytes(response.into_body(), MAX_BODY_BYTES);
            return match time::timeout_at(deadline, body).await {
                Ok(Ok(body)) => {
                    tracing::info!(
                        endpoint = %endpoint,
                        "Response from server: {}",
                        String::from_utf8_lossy(&body)
                    );
                    Ok(DispatchResponse { endpoint, body, attempts })
                }
                Ok(Err(e)) => {
                    tracing::error!(endpoint = %endpoint, error = %e, "Error reading response");
                    Err(DispatchError::BodyRead { endpoint, source: e })
                }
                Err(_) => {
                    tracing::error!(
                        endpoint = %endpoint,
                        timeout = ?timeout,
                        "Error reading response: timed out"
                    );
                    Err(DispatchError::BodyTimeout { endpoint, timeout })
                }
            };
        }
    }

    /// Dispatch repeatedly, pausing `interval` between calls, until shutdown.
    pub async fn run(self, interval: Duration, mut shutdown: ShutdownSignal) {
        tracing::info!(interval = ?interval, "Dispatch loop starting");

        loop {
            // Failures are already logged and counted inside dispatch().
            tokio::select! {
                _ = self.dispatch() => {}
                _ = shutdown.recv() => {
                    tracing::info!("Dispatch loop received shutdown signal, abandoning dispatch");
                    break;
                }
            }

            tokio::select! {
                _ = time::sleep(interval) => {}
                _ = shutdown.recv() => {
                    tracing::info!("Dispatch loop received shutdown signal, exiting loop");
                    break;
                }
            }
        }
    }
}
