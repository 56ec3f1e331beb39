//! Error types for the citation graph server.
//!
//! Uses `thiserror` for structured error handling with automatic `From` implementations.
//! The filter engine itself is infallible; errors only arise at the I/O edges.

use std::path::PathBuf;
use std::time::Duration;

/// Errors from loading the dataset.
#[derive(thiserror::Error, Debug)]
pub enum DatasetError {
    /// Dataset file could not be read
    #[error("Failed to read dataset {path}: {source}")]
    Io {
        /// Path of the dataset file
        path: PathBuf,
        /// Underlying I/O error
        source: std::io::Error,
    },

    /// Dataset is not a valid paper tree
    #[error("Failed to parse dataset: {0}")]
    Parse(#[from] serde_json::Error),

    /// Root record has no paper ID
    #[error("Dataset root record has no paper ID")]
    MissingRootId,
}

impl DatasetError {
    /// Create an I/O error for the given path.
    #[must_use]
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io { path: path.into(), source }
    }
}

/// Errors from the Semantic Scholar HTTP client.
#[derive(thiserror::Error, Debug)]
pub enum ClientError {
    /// HTTP transport error (connection, DNS, TLS, etc.)
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Middleware error
    #[error("Middleware error: {0}")]
    Middleware(#[from] reqwest_middleware::Error),

    /// Rate limited by Semantic Scholar API (429 response)
    #[error("Rate limited, retry after {retry_after:?}")]
    RateLimited {
        /// Suggested wait time before retry
        retry_after: Duration,
    },

    /// Resource not found (404 response)
    #[error("Resource not found: {resource}")]
    NotFound {
        /// Description of the missing resource
        resource: String,
    },

    /// Invalid request parameters (400 response)
    #[error("Bad request: {message}")]
    BadRequest {
        /// Error message from API
        message: String,
    },

    /// JSON parsing error
    #[error("Failed to parse response: {0}")]
    Parse(#[from] serde_json::Error),

    /// Server error (5xx response)
    #[error("Server error ({status}): {message}")]
    Server {
        /// HTTP status code
        status: u16,
        /// Error message
        message: String,
    },

    /// Unexpected HTTP status
    #[error("Unexpected status {status}: {message}")]
    UnexpectedStatus {
        /// HTTP status code
        status: u16,
        /// Response body or message
        message: String,
    },
}

impl ClientError {
    /// Create a rate limited error with retry-after duration.
    #[must_use]
    pub fn rate_limited(seconds: u64) -> Self {
        Self::RateLimited { retry_after: Duration::from_secs(seconds) }
    }

    /// Create a not found error.
    #[must_use]
    pub fn not_found(resource: impl Into<String>) -> Self {
        Self::NotFound { resource: resource.into() }
    }

    /// Create a bad request error.
    #[must_use]
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::BadRequest { message: message.into() }
    }

    /// Create a server error.
    #[must_use]
    pub fn server(status: u16, message: impl Into<String>) -> Self {
        Self::Server { status, message: message.into() }
    }

    /// Returns true if this error is retryable.
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        matches!(self, Self::RateLimited { .. } | Self::Server { .. })
    }
}

/// Errors from handling client actions.
#[derive(thiserror::Error, Debug)]
pub enum ServerError {
    /// Message or action payload is not valid JSON for its kind
    #[error("Malformed action: {0}")]
    Malformed(#[from] serde_json::Error),

    /// Action message has no `kind`
    #[error("Action message without kind")]
    MissingKind,

    /// Dataset could not be loaded
    #[error("Dataset unavailable: {0}")]
    Dataset(#[from] DatasetError),
}

impl ServerError {
    /// JSON payload reported back on the socket.
    #[must_use]
    pub fn to_client_message(&self) -> serde_json::Value {
        serde_json::json!({ "error": self.to_string() })
    }
}

/// Result type alias for dataset operations.
pub type DatasetResult<T> = Result<T, DatasetError>;

/// Result type alias for client operations.
pub type ClientResult<T> = Result<T, ClientError>;

/// Result type alias for action handling.
pub type ServerResult<T> = Result<T, ServerError>;
