//! Error types for the avatax-core library
//!
//! Defines the library-level error taxonomy using thiserror for ergonomic
//! error definitions and anyhow for flexible error sources. Transport-level
//! failures have their own representation in [`crate::http::error`]; only
//! fatal failures cross into this type.

use thiserror::Error;

/// Main error type for AvaTax client operations
#[derive(Error, Debug)]
pub enum Error {
    /// Configuration errors (missing credentials, bad endpoint, env parsing)
    #[error("Configuration error: {message}")]
    Configuration {
        message: String,
        #[source]
        source: Option<anyhow::Error>,
    },

    /// HTTP/network related errors that are fatal for a call
    #[error("HTTP error: {message}")]
    Http {
        message: String,
        #[source]
        source: Option<anyhow::Error>,
    },

    /// HTTP request building errors
    #[error("HTTP request error: {message}")]
    HttpRequest {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// JSON parsing and serialization errors
    #[error("JSON error: {message}")]
    Json {
        message: String,
        #[source]
        source: serde_json::Error,
    },

    /// Generic internal error with context
    #[error("Internal error: {message}")]
    Internal {
        message: String,
        #[source]
        source: anyhow::Error,
    },
}

/// Convenience type alias for Results using our Error type
pub type Result<T> = std::result::Result<T, Error>;

// Conversion implementations
impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Json {
            message: err.to_string(),
            source: err,
        }
    }
}

impl From<anyhow::Error> for Error {
    fn from(err: anyhow::Error) -> Self {
        Error::Internal {
            message: err.to_string(),
            source: err,
        }
    }
}
