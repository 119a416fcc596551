//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! registry / dispatcher / prober produce:
//!     → logging.rs (structured log events)
//!     → metrics.rs (counters, gauges)
//!
//! Consumers:
//!     → stdout (plain or JSON lines)
//!     → Prometheus scrape endpoint (optional)
//! ```
//!
//! # Design Decisions
//! - Each dispatch carries a `dispatch_id` span field
//! - Metrics are cheap and safe to call with no recorder installed

pub mod logging;
pub mod metrics;
