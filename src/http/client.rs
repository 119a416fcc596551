//! Outbound HTTP client.
//!
//! # Responsibilities
//! - Issue a body-less GET against an endpoint
//! - Bound the wait for response headers with a timeout
//! - Expose that timeout so callers can bound the body read as well
//! - Classify failures below the HTTP layer as transport errors
//!
//! # Design Decisions
//! - Status codes are not interpreted here; callers decide what is healthy
//! - The response body is handed back unread

use std::time::Duration;

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{header, Method, Request, Response};
use hyper_util::{
    client::legacy::{connect::HttpConnector, Client},
    rt::TokioExecutor,
};
use thiserror::Error;
use tokio::time;

use crate::load_balancer::Endpoint;

const USER_AGENT: &str = concat!("rr-dispatch/", env!("CARGO_PKG_VERSION"));

/// Errors raised before a response status is available.
#[derive(Debug, Error)]
pub enum TransportError {
    /// The request could not be constructed for this endpoint.
    #[error("failed to build request: {0}")]
    InvalidRequest(#[from] axum::http::Error),

    /// Connection refused, DNS failure, reset, protocol error.
    #[error("request failed: {0}")]
    Connect(#[from] hyper_util::client::legacy::Error),

    /// No response headers within the deadline.
    #[error("request timed out after {0:?}")]
    Timeout(Duration),
}

impl TransportError {
    /// True when the endpoint itself failed to answer.
    pub fn is_transport_failure(&self) -> bool {
        !matches!(self, TransportError::InvalidRequest(_))
    }
}

/// Something that can GET an endpoint.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn get(&self, endpoint: &Endpoint) -> Result<Response<Body>, TransportError>;

    /// Budget for one request, response body included.
    fn timeout(&self) -> Duration;
}

/// `Transport` backed by the hyper-util client.
#[derive(Clone)]
pub struct HttpTransport {
    client: Client<HttpConnector, Body>,
    timeout: Duration,
}

impl HttpTransport {
    pub fn new(timeout: Duration) -> Self {
        let client = Client::builder(TokioExecutor::new()).build(HttpConnector::new());
        Self { client, timeout }
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn get(&self, endpoint: &Endpoint) -> Result<Response<Body>, TransportError> {
        let request = Request::builder()
            .method(Method::GET)
            .uri(endpoint.as_str())
            .header(header::USER_AGENT, USER_AGENT)
            .body(Body::empty())?;

        match time::timeout(self.timeout, self.client.request(request)).await {
            Ok(Ok(response)) => {
                let (parts, body) = response.into_parts();
                Ok(Response::from_parts(parts, Body::new(body)))
            }
            Ok(Err(e)) => Err(TransportError::Connect(e)),
            Err(_) => Err(TransportError::Timeout(self.timeout)),
        }
    }

    fn timeout(&self) -> Duration {
        self.timeout
    }
}
