//! Renderer error types.

use sketch_core::CanvasError;
use thiserror::Error;

/// Result type for renderer operations.
pub type RenderResult<T> = Result<T, RenderError>;

/// Errors that can occur during rendering.
#[derive(Debug, Error)]
pub enum RenderError {
    /// The raster surface could not be (re)allocated.
    #[error("Surface error: {0}")]
    Surface(String),

    /// A text label could not be laid out or rasterized.
    #[error("Text rendering failed: {0}")]
    Text(String),

    /// Export to an image format failed.
    #[error("Export failed: {0}")]
    Export(String),

    /// The drawing backend rejected a call.
    #[error("Backend error: {0}")]
    Backend(String),

    /// The sketch session refused the request.
    #[error(transparent)]
    Canvas(#[from] CanvasError),
}
