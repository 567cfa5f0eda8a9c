//! Gateway error types

use crate::config::ConfigError;
use thiserror::Error;

/// Reasons an `HttpGateway` cannot be constructed
#[derive(Debug, Error)]
pub enum GatewayBuildError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("Failed to create HTTP client: {0}")]
    Client(#[from] reqwest::Error),
}

/// Transport failure with classification.
///
/// The kind is informational only: every kind is terminal for the turn.
#[derive(Debug, Error)]
#[error("{message}")]
pub struct GatewayError {
    pub kind: GatewayErrorKind,
    pub message: String,
}

impl GatewayError {
    pub fn new(kind: GatewayErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    pub fn timeout(message: impl Into<String>) -> Self {
        Self::new(GatewayErrorKind::Timeout, message)
    }

    pub fn network(message: impl Into<String>) -> Self {
        Self::new(GatewayErrorKind::Network, message)
    }

    pub fn status(code: u16, message: impl Into<String>) -> Self {
        Self::new(GatewayErrorKind::Status(code), message)
    }

    pub fn decode(message: impl Into<String>) -> Self {
        Self::new(GatewayErrorKind::Decode, message)
    }
}

impl From<reqwest::Error> for GatewayError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            GatewayError::timeout(format!("Request timeout: {e}"))
        } else if e.is_connect() {
            GatewayError::network(format!("Connection failed: {e}"))
        } else if e.is_decode() {
            GatewayError::decode(format!("Failed to read response: {e}"))
        } else {
            GatewayError::network(format!("Request failed: {e}"))
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GatewayErrorKind {
    /// No response within the request timeout
    Timeout,
    /// Connection refused, reset, DNS, TLS
    Network,
    /// Non-2xx HTTP status
    Status(u16),
    /// Body was not the expected JSON
    Decode,
}
