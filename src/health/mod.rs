//! Health checking subsystem.
//!
//! # Data Flow
//! ```text
//! Periodic timer
//!     → registry.snapshot_removed()
//!     → probe each removed endpoint (concurrently, lock released)
//!     → registry.reinstate() for every 200 OK
//! ```
//!
//! # Design Decisions
//! - Only removed endpoints are probed; active ones prove themselves by serving
//! - A single `200 OK` reinstates; no success threshold
//! - Any other status, including other 2xx codes, keeps the endpoint removed

pub mod prober;

pub use prober::{HealthProber, ProbeReport};
