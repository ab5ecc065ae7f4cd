//! Error types for the Forge client.
//!
//! # Design
//! Callers mostly need to tell "never reached the server" apart from "the
//! server said no", so those are the two headline variants. `Connection`
//! keeps the transport's own error as its source; `Server` keeps the status
//! and the best-effort message extracted from the JSON error body.

use thiserror::Error;

/// Boxed transport error carried by [`ForgeError::Connection`].
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

pub type Result<T> = std::result::Result<T, ForgeError>;

/// Errors returned by render and client operations.
#[derive(Debug, Error)]
pub enum ForgeError {
    /// No HTTP response was obtained: DNS, TCP, TLS, timeout or a body read
    /// that failed midway.
    #[error("connection error: {0}")]
    Connection(#[source] BoxError),

    /// The server answered with a status other than 200.
    #[error("server error ({status}): {message}")]
    Server { status: u16, message: String },

    /// The render source (HTML or URL) was an empty string.
    #[error("render source must not be empty")]
    EmptySource,

    /// A numeric option was NaN or infinite, which JSON cannot represent.
    /// Carries the wire path of the offending field.
    #[error("{0} must be a finite number")]
    InvalidValue(&'static str),

    /// The request payload could not be encoded as JSON.
    #[error("serialization failed: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Client configuration could not be loaded.
    #[error("invalid configuration: {0}")]
    Config(String),
}

impl ForgeError {
    pub(crate) fn connection(err: impl Into<BoxError>) -> Self {
        ForgeError::Connection(err.into())
    }

    /// HTTP status of a `Server` error.
    pub fn status(&self) -> Option<u16> {
        match self {
            ForgeError::Server { status, .. } => Some(*status),
            _ => None,
        }
    }

    pub fn is_connection(&self) -> bool {
        matches!(self, ForgeError::Connection(_))
    }
}
