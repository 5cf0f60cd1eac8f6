//! Error types for the Cinefuse library.
//!
//! Client-facing operations absorb their own failures (a lookup that fails
//! returns `None`, a generation request that fails returns an empty
//! suggestion), so these errors surface only from the store, the storage
//! backend, and configuration.

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for the Cinefuse library.
#[derive(Debug, Error)]
pub enum CinefuseError {
    // Network errors
    #[error("Network error: {message}")]
    Network {
        message: String,
        /// Optional cause description
        cause: Option<String>,
    },

    #[error("Request timeout after {0:?}")]
    Timeout(std::time::Duration),

    // Database errors
    #[error("Database error: {message}")]
    Database {
        message: String,
        #[source]
        source: Option<rusqlite::Error>,
    },

    // File system errors
    #[error("IO error at {path:?}: {message}")]
    Io {
        message: String,
        path: Option<PathBuf>,
        #[source]
        source: Option<std::io::Error>,
    },

    // Serialization errors
    #[error("JSON error: {message}")]
    Json {
        message: String,
        #[source]
        source: Option<serde_json::Error>,
    },

    // Configuration errors
    #[error("Configuration error: {message}")]
    Config { message: String },

    // Generic errors
    #[error("{0}")]
    Other(String),
}

/// Result type alias for Cinefuse operations.
pub type Result<T> = std::result::Result<T, CinefuseError>;

// Conversion implementations for common error types

impl From<std::io::Error> for CinefuseError {
    fn from(err: std::io::Error) -> Self {
        CinefuseError::Io {
            message: err.to_string(),
            path: None,
            source: Some(err),
        }
    }
}

impl From<serde_json::Error> for CinefuseError {
    fn from(err: serde_json::Error) -> Self {
        CinefuseError::Json {
            message: err.to_string(),
            source: Some(err),
        }
    }
}

impl From<rusqlite::Error> for CinefuseError {
    fn from(err: rusqlite::Error) -> Self {
        CinefuseError::Database {
            message: err.to_string(),
            source: Some(err),
        }
    }
}

impl From<reqwest::Error> for CinefuseError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            CinefuseError::Timeout(std::time::Duration::from_secs(0))
        } else {
            CinefuseError::Network {
                message: err.to_string(),
                cause: Some(err.to_string()),
            }
        }
    }
}
