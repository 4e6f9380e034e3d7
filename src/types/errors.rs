//! Application error types.
//!
//! All errors use `thiserror` for automatic Error trait derivation. Each kind
//! maps deterministically to an HTTP-style status code; the envelope layer
//! performs that mapping exactly once per call.

use thiserror::Error;

/// Application result type.
pub type Result<T> = std::result::Result<T, Error>;

/// Main error enum for the gateway.
#[derive(Error, Debug)]
pub enum Error {
    /// Missing or malformed call context (maps to 400).
    #[error("{0}")]
    BadRequest(String),

    /// Expired or invalid-signature/algorithm token (maps to 401).
    #[error("{0}")]
    Unauthorized(String),

    /// Missing credential, malformed scope claim, or insufficient scope
    /// (maps to 403).
    #[error("{0}")]
    Forbidden(String),

    /// Unknown tool (maps to 404).
    #[error("not found: {0}")]
    NotFound(String),

    /// Non-2xx response from a backend service; the backend status code is
    /// passed through to the envelope.
    #[error("{message}")]
    Upstream { status: u16, message: String },

    /// Internal errors (map to 500, detail never echoed to the caller).
    #[error("internal error: {0}")]
    Internal(String),

    /// Serialization/deserialization errors.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Outbound HTTP transport errors.
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),

    /// I/O errors.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Status code the caller sees for this error kind.
    pub fn status_code(&self) -> u16 {
        match self {
            Error::BadRequest(_) => 400,
            Error::Unauthorized(_) => 401,
            Error::Forbidden(_) => 403,
            Error::NotFound(_) => 404,
            Error::Upstream { status, .. } => *status,
            Error::Internal(_) | Error::Serialization(_) | Error::Http(_) | Error::Io(_) => 500,
        }
    }

    /// Whether this kind is part of the caller-facing taxonomy. Anything else
    /// is degraded to a generic 500 before leaving the middleware.
    pub fn is_recognized(&self) -> bool {
        !matches!(
            self,
            Error::Internal(_) | Error::Serialization(_) | Error::Http(_) | Error::Io(_)
        )
    }
}

// Convenience constructors
impl Error {
    pub fn bad_request(msg: impl Into<String>) -> Self {
        Self::BadRequest(msg.into())
    }

    pub fn unauthorized(msg: impl Into<String>) -> Self {
        Self::Unauthorized(msg.into())
    }

    pub fn forbidden(msg: impl Into<String>) -> Self {
        Self::Forbidden(msg.into())
    }

    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::NotFound(msg.into())
    }

    pub fn upstream(status: u16, msg: impl Into<String>) -> Self {
        Self::Upstream {
            status,
            message: msg.into(),
        }
    }

    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }
}
