use axum::{extract::State, Json};
use serde::Serialize;

use crate::admin::AdminState;
use crate::load_balancer::RegistrySnapshot;

#[derive(Debug, Serialize)]
pub struct SystemStatus {
    pub version: &'static str,
    pub status: &'static str,
    pub active_endpoints: usize,
    pub removed_endpoints: usize,
}

pub async fn get_status(State(state): State<AdminState>) -> Json<SystemStatus> {
    let snapshot = state.registry.snapshot();
    let status = if snapshot.active.is_empty() { "degraded" } else { "operational" };

    Json(SystemStatus {
        version: env!("CARGO_PKG_VERSION"),
        status,
        active_endpoints: snapshot.active.len(),
        removed_endpoints: snapshot.removed.len(),
    })
}

pub async fn get_endpoints(State(state): State<AdminState>) -> Json<RegistrySnapshot> {
    Json(state.registry.snapshot())
}
