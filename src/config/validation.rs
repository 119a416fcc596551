//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate value ranges (intervals and timeouts > 0)
//! - Validate bind addresses of optional listeners
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Backend URLs are not checked here; the registry logs and skips bad ones

use std::fmt;
use std::net::SocketAddr;

use crate::config::schema::DispatcherConfig;

/// A single semantic problem in the configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    NoBackends,
    ZeroValue { field: &'static str },
    InvalidAddress { field: &'static str, value: String },
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidationError::NoBackends => write!(f, "no backends configured"),
            ValidationError::ZeroValue { field } => {
                write!(f, "{} must be greater than zero", field)
            }
            ValidationError::InvalidAddress { field, value } => {
                write!(f, "{} is not a valid socket address: {}", field, value)
            }
        }
    }
}

impl std::error::Error for ValidationError {}

/// Check the configuration, collecting every problem found.
pub fn validate_config(config: &DispatcherConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.backends.is_empty() {
        errors.push(ValidationError::NoBackends);
    }

    let positive = [
        ("dispatch.interval_ms", config.dispatch.interval_ms),
        ("dispatch.request_timeout_secs", config.dispatch.request_timeout_secs),
        ("health_check.interval_secs", config.health_check.interval_secs),
        ("health_check.timeout_secs", config.health_check.timeout_secs),
    ];
    for (field, value) in positive {
        if value == 0 {
            errors.push(ValidationError::ZeroValue { field });
        }
    }

    if config.observability.metrics_enabled
        && config.observability.metrics_address.parse::<SocketAddr>().is_err()
    {
        errors.push(ValidationError::InvalidAddress {
            field: "observability.metrics_address",
            value: config.observability.metrics_address.clone(),
        });
    }

    if config.admin.enabled && config.admin.bind_address.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::InvalidAddress {
            field: "admin.bind_address",
            value: config.admin.bind_address.clone(),
        });
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
