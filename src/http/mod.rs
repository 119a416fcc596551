//! Outbound HTTP.
//!
//! # Data Flow
//! ```text
//! Endpoint (from registry)
//!     → client.rs (GET, timeout)
//!     → Response<Body> or TransportError
//!     → dispatcher / prober interpret the status
//! ```

pub mod client;

#[cfg(test)]
pub(crate) mod testing;

pub use client::{HttpTransport, Transport, TransportError};
