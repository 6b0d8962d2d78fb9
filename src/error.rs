//! Error types for finna-harvest
//!
//! A single crate-wide error enum with `#[from]` conversions for the
//! underlying HTTP and serialization errors, plus domain variants for
//! configuration, upstream API failures, and storage sinks.

use thiserror::Error;

/// Result type alias for finna-harvest operations
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for finna-harvest
#[derive(Debug, Error)]
pub enum Error {
    /// Configuration error with context about which setting is invalid
    #[error("configuration error: {message}")]
    Config {
        /// Human-readable error message describing the configuration issue
        message: String,
        /// The configuration key that caused the error (e.g., "endpoint")
        key: Option<String>,
    },

    /// Network-level error (connect, timeout, body read)
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    /// Upstream API returned a non-success HTTP status
    #[error("API error: HTTP {status}: {message}")]
    Api {
        /// HTTP status code returned by the search endpoint
        status: u16,
        /// Response body or status text, for diagnostics
        message: String,
    },

    /// Serialization error
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Storage sink failure (buffer flush, commit)
    #[error("storage error: {0}")]
    Storage(String),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Other error
    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Create a configuration error for a specific key
    pub fn config(message: impl Into<String>, key: impl Into<String>) -> Self {
        Error::Config {
            message: message.into(),
            key: Some(key.into()),
        }
    }
}
