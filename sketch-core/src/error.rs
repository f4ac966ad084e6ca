//! Error types for sketch canvas operations.

use thiserror::Error;

/// Result type for sketch canvas operations.
pub type CanvasResult<T> = Result<T, CanvasError>;

/// Errors that can occur in sketch canvas operations.
#[derive(Debug, Error)]
pub enum CanvasError {
    /// Export was requested while the committed list is empty.
    #[error("Canvas is empty: nothing to export")]
    EmptyCanvas,

    /// The session is not in a state that allows the operation.
    #[error("Precondition not met: {0}")]
    PreconditionNotMet(String),

    /// The user dismissed a text prompt without entering anything.
    #[error("Text input cancelled")]
    Cancelled,

    /// A color string could not be parsed.
    #[error("Invalid color: {0}")]
    InvalidColor(String),

    /// A stroke width was zero, negative or not finite.
    #[error("Invalid stroke width: {0}")]
    InvalidWidth(f32),

    /// A surface size was zero, negative or not finite.
    #[error("Invalid surface size: {width}x{height}")]
    InvalidSize {
        /// Requested width.
        width: f32,
        /// Requested height.
        height: f32,
    },

    /// A tool name did not match any known tool.
    #[error("Unknown tool: {0}")]
    UnknownTool(String),

    /// Gesture script or primitive (de)serialization error.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl CanvasError {
    /// Shorthand for [`CanvasError::PreconditionNotMet`].
    pub(crate) fn precondition(message: impl Into<String>) -> Self {
        Self::PreconditionNotMet(message.into())
    }
}
