//! Storage error types.

use thiserror::Error;

/// Errors returned by the storage client.
#[derive(Debug, Error)]
pub enum StorageError {
    /// HTTP transport error.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Access key or secret missing from the environment.
    #[error("AWS credentials not found in environment: {0}")]
    MissingCredentials(String),

    /// The service rejected the request.
    #[error("S3 error {status} ({code}): {message}")]
    Api {
        /// HTTP status code.
        status: u16,
        /// S3 error code, e.g. `NoSuchBucket`.
        code: String,
        /// Error message from the service.
        message: String,
    },

    /// The response body was not a listing.
    #[error("Malformed S3 response: {0}")]
    Malformed(String),

    /// Requested link lifetime is outside what SigV4 allows.
    #[error("Invalid expiry: {0}")]
    InvalidExpiry(String),
}

/// Result type for storage operations.
pub type Result<T> = std::result::Result<T, StorageError>;
