//! Load balancing subsystem.
//!
//! # Data Flow
//! ```text
//! Configured backend URLs
//!     → endpoint.rs (parse & normalize, reject invalid)
//!     → registry.rs (active sequence + removed set, one lock)
//!     → round_robin.rs (cursor mod len(active))
//!     → Endpoint handed to dispatcher / prober
//! ```
//!
//! # Design Decisions
//! - The registry is the only owner of selection state
//! - Endpoints are values; lookups use the normalized URL
//! - Failed endpoints are removed outright, not weighted down

pub mod endpoint;
pub mod registry;
pub mod round_robin;

pub use endpoint::{Endpoint, EndpointError};
pub use registry::{Registry, RegistrySnapshot};
