//! Error types for the diagram client.

use sketch_core::CanvasError;
use thiserror::Error;

/// Errors that can occur when talking to the diagram service.
#[derive(Debug, Error)]
pub enum DiagramError {
    /// The base URL provided by configuration is invalid.
    #[error("invalid diagram service URL: {0}")]
    InvalidUrl(String),

    /// HTTP layer failed (connection, timeout, etc.).
    #[error("diagram service HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// JSON parsing failed.
    #[error("failed to parse diagram service payload: {0}")]
    Json(#[from] serde_json::Error),

    /// The service answered 503: no AI backend is configured.
    #[error("AI service not configured")]
    NotConfigured,

    /// The service answered with an unexpected HTTP status.
    #[error("diagram service returned HTTP {0}")]
    Status(u16),

    /// The service reported a failure in its response envelope.
    #[error("diagram service error: {0}")]
    Remote(String),

    /// The response did not match the expected structure.
    #[error("unexpected diagram service response: {0}")]
    UnexpectedResponse(String),

    /// The local sketch could not provide what the call needs.
    #[error(transparent)]
    Canvas(#[from] CanvasError),

    /// A required input was empty or absent.
    #[error("missing input: {0}")]
    MissingInput(&'static str),
}

impl DiagramError {
    /// Returns true if this error is retryable (transient HTTP failures).
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Http(_))
    }
}

/// Result type for diagram client operations.
pub type DiagramResult<T> = Result<T, DiagramError>;
