/*!
 * Error types for the doctran application.
 *
 * This module contains custom error types for different parts of the application,
 * using the thiserror crate for ergonomic error definitions.
 */

// Allow dead code - error types are for library consumers
#![allow(dead_code)]

use thiserror::Error;

/// Errors that can occur when calling an external transform provider
#[derive(Error, Debug)]
pub enum TransformError {
    /// Error when making an API request fails
    #[error("API request failed: {0}")]
    RequestFailed(String),

    /// Error when parsing an API response fails
    #[error("Failed to parse API response: {0}")]
    ParseError(String),

    /// Error returned by the API itself
    #[error("API responded with error: {status_code} - {message}")]
    ApiError {
        /// HTTP status code
        status_code: u16,
        /// Error message from the API
        message: String,
    },

    /// Error establishing or maintaining a connection
    #[error("Connection error: {0}")]
    ConnectionError(String),

    /// Error related to rate limiting
    #[error("Rate limit exceeded: {0}")]
    RateLimitExceeded(String),

    /// Error with authentication
    #[error("Authentication error: {0}")]
    AuthenticationError(String),

    /// Provider returned an empty completion
    #[error("Provider returned an empty response")]
    EmptyResponse,
}

impl TransformError {
    /// Whether a retry could plausibly succeed.
    ///
    /// The pipeline surfaces transient and fatal failures identically; this
    /// classification exists for callers that implement their own retry policy.
    pub fn is_transient(&self) -> bool {
        match self {
            Self::ConnectionError(_) | Self::RateLimitExceeded(_) => true,
            Self::ApiError { status_code, .. } => *status_code >= 500 || *status_code == 429,
            Self::RequestFailed(_) => true,
            Self::ParseError(_) | Self::AuthenticationError(_) | Self::EmptyResponse => false,
        }
    }
}

/// Errors that can occur in the persistence layer
#[derive(Error, Debug)]
pub enum StorageError {
    /// Underlying SQLite failure
    #[error("Database error: {0}")]
    Database(String),

    /// A referenced record does not exist
    #[error("Record not found: {0}")]
    RecordNotFound(String),

    /// A stored value could not be interpreted
    #[error("Corrupt record: {0}")]
    CorruptRecord(String),
}

impl From<rusqlite::Error> for StorageError {
    fn from(error: rusqlite::Error) -> Self {
        match error {
            rusqlite::Error::QueryReturnedNoRows => {
                Self::RecordNotFound("query returned no rows".to_string())
            }
            other => Self::Database(other.to_string()),
        }
    }
}

/// Errors that can occur during a translation run
#[derive(Error, Debug)]
pub enum PipelineError {
    /// The requested document does not exist
    #[error("Document {0} not found")]
    NotFound(i64),

    /// The document has no raw content to translate
    #[error("Document {0} has no content to translate")]
    EmptyContent(i64),

    /// A translation run is already in flight for this document
    #[error("A translation run is already in progress for document {0}")]
    RunInProgress(i64),

    /// Error from the transform provider
    #[error("Transform error: {0}")]
    Transform(#[from] TransformError),

    /// Error from the persistence layer
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),
}

/// Main application error type that wraps all other errors
#[derive(Error, Debug)]
pub enum AppError {
    /// Error from a file operation
    #[error("File error: {0}")]
    File(String),

    /// Error from a transform provider
    #[error("Transform error: {0}")]
    Transform(#[from] TransformError),

    /// Error from the persistence layer
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    /// Error from a translation run
    #[error("Pipeline error: {0}")]
    Pipeline(#[from] PipelineError),

    /// Any other error
    #[error("Unknown error: {0}")]
    Unknown(String),
}

// Utility functions for error conversion
impl From<anyhow::Error> for AppError {
    fn from(error: anyhow::Error) -> Self {
        Self::Unknown(error.to_string())
    }
}

impl From<std::io::Error> for AppError {
    fn from(error: std::io::Error) -> Self {
        Self::File(error.to_string())
    }
}
