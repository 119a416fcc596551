//! Endpoint abstraction.
//!
//! # Responsibilities
//! - Parse a configured backend specification into a normalized URL
//! - Reject specifications the transport cannot reach (non-http, no host)
//! - Provide value equality on the normalized form
//!
//! # Design Decisions
//! - Equality and hashing use the normalized string, never identity, so two
//!   independently parsed copies of the same backend compare equal
//! - Immutable once constructed

use std::fmt;
use std::hash::{Hash, Hasher};
use std::str::FromStr;

use thiserror::Error;
use url::Url;

/// Errors produced while parsing an endpoint specification.
#[derive(Debug, Error)]
pub enum EndpointError {
    /// The specification is not a valid URL.
    #[error("invalid URL '{spec}': {source}")]
    InvalidUrl {
        spec: String,
        #[source]
        source: url::ParseError,
    },

    /// Only plain `http` backends are supported.
    #[error("unsupported scheme '{scheme}' in '{spec}'")]
    UnsupportedScheme { spec: String, scheme: String },

    /// The URL has no host component.
    #[error("missing host in '{spec}'")]
    MissingHost { spec: String },
}

/// A single backend target.
#[derive(Debug, Clone)]
pub struct Endpoint {
    url: Url,
}

impl Endpoint {
    /// Parse a backend specification such as `http://localhost:81`.
    pub fn parse(spec: &str) -> Result<Self, EndpointError> {
        let url = Url::parse(spec.trim()).map_err(|source| EndpointError::InvalidUrl {
            spec: spec.to_string(),
            source,
        })?;

        if url.scheme() != "http" {
            return Err(EndpointError::UnsupportedScheme {
                spec: spec.to_string(),
                scheme: url.scheme().to_string(),
            });
        }

        if url.host_str().map_or(true, str::is_empty) {
            return Err(EndpointError::MissingHost {
                spec: spec.to_string(),
            });
        }

        Ok(Self { url })
    }

    /// The normalized form used for comparisons.
    pub fn as_str(&self) -> &str {
        self.url.as_str()
    }

    /// The parsed URL.
    pub fn url(&self) -> &Url {
        &self.url
    }
}

impl FromStr for Endpoint {
    type Err = EndpointError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl PartialEq for Endpoint {
    fn eq(&self, other: &Self) -> bool {
        self.as_str() == other.as_str()
    }
}

impl Eq for Endpoint {}

impl Hash for Endpoint {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.as_str().hash(state);
    }
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
