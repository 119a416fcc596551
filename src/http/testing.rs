//! In-memory `Transport` for unit tests.

use std::collections::HashMap;
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use axum::body::{Body, Bytes};
use axum::http::{Response, StatusCode};
use futures_util::StreamExt;

use crate::http::client::{Transport, TransportError};
use crate::load_balancer::Endpoint;

/// Canned behaviour for one endpoint.
#[derive(Debug, Clone)]
pub enum Reply {
    Status(u16, &'static str),
    /// 200 headers, then the body stream fails.
    BrokenBody,
    /// 200 headers, then the body never finishes.
    StalledBody,
    /// The request never completes.
    Hang,
    Unreachable,
}

/// Request budget reported by `ScriptedTransport`.
pub const SCRIPTED_TIMEOUT: Duration = Duration::from_secs(1);

/// Replies per endpoint; unknown endpoints are unreachable.
#[derive(Default)]
pub struct ScriptedTransport {
    replies: Mutex<HashMap<String, Reply>>,
    calls: Mutex<Vec<String>>,
}

impl ScriptedTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reply(self, spec: &str, reply: Reply) -> Self {
        self.set(spec, reply);
        self
    }

    pub fn set(&self, spec: &str, reply: Reply) {
        let key = Endpoint::parse(spec).unwrap().to_string();
        self.replies.lock().unwrap().insert(key, reply);
    }

    /// Endpoints requested so far, in order.
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl Transport for ScriptedTransport {
    async fn get(&self, endpoint: &Endpoint) -> Result<Response<Body>, TransportError> {
        self.calls.lock().unwrap().push(endpoint.to_string());
        let reply = self
            .replies
            .lock()
            .unwrap()
            .get(endpoint.as_str())
            .cloned()
            .unwrap_or(Reply::Unreachable);

        match reply {
            Reply::Status(code, body) => Ok(Response::builder()
                .status(StatusCode::from_u16(code).unwrap())
                .body(Body::from(body))
                .unwrap()),
            Reply::BrokenBody => {
                let stream = futures_util::stream::iter(vec![
                    Ok(Bytes::from_static(b"partial")),
                    Err(std::io::Error::new(std::io::ErrorKind::ConnectionReset, "reset mid-body")),
                ]);
                Ok(Response::builder()
                    .status(StatusCode::OK)
                    .body(Body::from_stream(stream))
                    .unwrap())
            }
            Reply::StalledBody => {
                let stream = futures_util::stream::iter(vec![Ok::<_, std::io::Error>(
                    Bytes::from_static(b"partial"),
                )])
                .chain(futures_util::stream::pending());
                Ok(Response::builder()
                    .status(StatusCode::OK)
                    .body(Body::from_stream(stream))
                    .unwrap())
            }
            Reply::Hang => std::future::pending().await,
            Reply::Unreachable => Err(TransportError::Timeout(Duration::ZERO)),
        }
    }

    fn timeout(&self) -> Duration {
        SCRIPTED_TIMEOUT
    }
}
