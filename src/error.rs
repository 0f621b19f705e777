//! Error types for the cache proxy
//!
//! Provides unified error handling using thiserror.

use std::path::PathBuf;
use std::time::Duration;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

// == Cache Error Enum ==
/// Errors raised by the in-memory cache store.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CacheError {
    /// Item does not fit in the cache budget
    #[error("Item too large: {key} is {size_kb:.2} KB, cache capacity is {max_size_kb:.2} KB")]
    ItemTooLarge {
        key: String,
        size_kb: f64,
        max_size_kb: f64,
    },
}

// == Storage Error Enum ==
/// Errors raised by a backing store.
#[derive(Error, Debug)]
pub enum StorageError {
    /// Object does not exist in the backing store
    #[error("Object not found: {0}")]
    NotFound(String),

    /// Backing store refused access to the object
    #[error("Access denied: {0}")]
    Denied(String),

    /// Transient failure that may clear on retry
    #[error("Backing store unavailable: {0}")]
    Unavailable(String),

    /// Read did not complete before the deadline
    #[error("Backing store read timed out after {0:?}")]
    Timeout(Duration),

    /// Backing store client could not be constructed
    #[error("Backing store initialisation failed: {0}")]
    Init(String),
}

impl StorageError {
    /// Whether a failed read may succeed when attempted again.
    pub fn is_retryable(&self) -> bool {
        matches!(self, StorageError::Unavailable(_))
    }

    /// Maps an HTTP status returned by an object store to an error.
    pub fn from_status(status: u16, key: &str) -> Self {
        match status {
            404 => StorageError::NotFound(key.to_string()),
            401 | 403 => StorageError::Denied(key.to_string()),
            408 | 429 | 500..=599 => {
                StorageError::Unavailable(format!("HTTP {} for {}", status, key))
            }
            _ => StorageError::NotFound(format!("HTTP {} for {}", status, key)),
        }
    }
}

// == Proxy Error Enum ==
/// Per-request failures, each mapped to a status code with an empty body.
#[derive(Error, Debug)]
pub enum ProxyError {
    /// Only GET is served
    #[error("Method not allowed: {0}")]
    MethodNotAllowed(String),

    /// Key is in neither the cache nor the backing store
    #[error("Not found: {0}")]
    NotFound(String),
}

// == IntoResponse Implementation ==
impl IntoResponse for ProxyError {
    fn into_response(self) -> Response {
        let status = match &self {
            ProxyError::MethodNotAllowed(_) => StatusCode::METHOD_NOT_ALLOWED,
            ProxyError::NotFound(_) => StatusCode::NOT_FOUND,
        };

        status.into_response()
    }
}

// == Config Error Enum ==
/// Errors raised while loading the configuration file.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Config file could not be read
    #[error("Unable to read config file {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Config file is not valid YAML for the expected shape
    #[error("Unable to parse config: {0}")]
    Parse(#[from] serde_yaml::Error),

    /// A field holds a value the server cannot run with
    #[error("Invalid config: {0}")]
    Invalid(String),
}

// == Result Type Alias ==
/// Convenience Result type for request handlers.
pub type Result<T> = std::result::Result<T, ProxyError>;
