//! Round-robin request dispatcher library.

pub mod admin;
pub mod config;
pub mod dispatch;
pub mod health;
pub mod http;
pub mod lifecycle;
pub mod load_balancer;
pub mod observability;

pub use config::DispatcherConfig;
pub use dispatch::{DispatchError, DispatchResponse, Dispatcher};
pub use health::HealthProber;
pub use lifecycle::{Balancer, Shutdown};
pub use load_balancer::{Endpoint, Registry};
