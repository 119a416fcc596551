//! Dispatch subsystem.
//!
//! # Data Flow
//! ```text
//! dispatch loop tick
//!     → dispatcher.rs (select, request, classify)
//!     → registry.remove() on transport failure, then reselect
//!     → response body logged on 200
//! ```
//!
//! # Design Decisions
//! - Only `200 OK` counts as success
//! - Non-200 answers end the attempt but keep the endpoint
//! - No dispatch error is fatal to the process

pub mod dispatcher;

use std::time::Duration;

use axum::http::StatusCode;
use thiserror::Error;

use crate::http::TransportError;
use crate::load_balancer::Endpoint;

pub use dispatcher::{DispatchResponse, Dispatcher};

/// Ways a single dispatch can end without a usable response.
#[derive(Debug, Error)]
pub enum DispatchError {
    /// Every endpoint is currently removed.
    #[error("No active servers available")]
    NoActiveServers,

    /// A response arrived with a status other than 200.
    #[error("{endpoint} responded with {status}")]
    NonSuccessStatus { endpoint: Endpoint, status: StatusCode },

    /// A 200 response whose body could not be read in full.
    #[error("Error reading response from {endpoint}: {source}")]
    BodyRead {
        endpoint: Endpoint,
        #[source]
        source: axum::Error,
    },

    /// A 200 response whose body did not arrive within the request timeout.
    #[error("Timed out reading response from {endpoint} after {timeout:?}")]
    BodyTimeout { endpoint: Endpoint, timeout: Duration },

    /// The request could not be constructed.
    #[error("Error creating request for {endpoint}: {source}")]
    InvalidRequest {
        endpoint: Endpoint,
        #[source]
        source: TransportError,
    },
}

impl DispatchError {
    /// Metric label for this outcome.
    pub fn outcome(&self) -> &'static str {
        match self {
            DispatchError::NoActiveServers => "no_active_servers",
            DispatchError::NonSuccessStatus { .. } => "non_success_status",
            DispatchError::BodyRead { .. } | DispatchError::BodyTimeout { .. } => "body_read_error",
            DispatchError::InvalidRequest { .. } => "invalid_request",
        }
    }
}
