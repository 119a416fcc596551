//! Read-only admin API.
//!
//! - `GET /admin/status`: version and endpoint counts
//! - `GET /admin/endpoints`: full registry snapshot

pub mod handlers;

use std::sync::Arc;

use axum::{routing::get, Router};
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;

use crate::lifecycle::ShutdownSignal;
use crate::load_balancer::Registry;

use self::handlers::{get_endpoints, get_status};

#[derive(Clone)]
pub struct AdminState {
    pub registry: Arc<Registry>,
}

pub fn setup_admin_router(state: AdminState) -> Router {
    Router::new()
        .route("/admin/status", get(get_status))
        .route("/admin/endpoints", get(get_endpoints))
        .with_state(state)
        .layer(TraceLayer::new_for_http())
}

/// Serve the admin API until shutdown.
pub async fn serve(
    listener: TcpListener,
    registry: Arc<Registry>,
    mut shutdown: ShutdownSignal,
) -> Result<(), std::io::Error> {
    let addr = listener.local_addr()?;
    tracing::info!(address = %addr, "Admin API listening");

    let app = setup_admin_router(AdminState { registry });
    axum::serve(listener, app)
        .with_graceful_shutdown(async move { shutdown.recv().await })
        .await?;

    tracing::info!("Admin API stopped");
    Ok(())
}
