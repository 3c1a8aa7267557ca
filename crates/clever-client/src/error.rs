//! Error types for Clever client operations

use clever_core::SchemaError;
use thiserror::Error;

/// Result type alias for Clever client operations
pub type Result<T> = std::result::Result<T, CleverClientError>;

/// Transport-level failures, potentially transient
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConnectionError {
    /// No response within the request timeout
    #[error("Timeout while connecting to Clever backend")]
    Timeout,

    /// The backend answered with a non-2xx status
    #[error("Clever backend rejected request with HTTP {status}: {message}")]
    Rejected { status: u16, message: String },

    /// Connection could not be established or broke mid-request
    #[error("Transport error: {0}")]
    Transport(String),

    /// The owning component closed the transport
    #[error("Transport has been closed")]
    Closed,
}

impl ConnectionError {
    pub fn is_timeout(&self) -> bool {
        matches!(self, Self::Timeout)
    }

    /// HTTP status of a rejected request
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Rejected { status, .. } => Some(*status),
            _ => None,
        }
    }
}

/// Errors that can occur during Clever client operations
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CleverClientError {
    /// Backend unreachable or rejected the request
    #[error(transparent)]
    Connection(#[from] ConnectionError),

    /// Backend payload did not match the expected shape
    #[error(transparent)]
    Schema(#[from] SchemaError),

    /// Backend reported a business-logic failure
    #[error("Clever backend reported: {0}")]
    Clever(String),

    /// Confirmation link could not be interpreted
    #[error("Invalid confirmation link: {0}")]
    InvalidLink(String),

    /// Invalid URL
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// Configuration could not be loaded
    #[error("Invalid configuration: {0}")]
    Config(String),
}

impl CleverClientError {
    /// Whether the failure came from the transport rather than the payload
    pub fn is_connection(&self) -> bool {
        matches!(self, Self::Connection(_))
    }

    pub fn is_timeout(&self) -> bool {
        matches!(self, Self::Connection(ConnectionError::Timeout))
    }
}
