//! Error types for canvas operations.

use thiserror::Error;

/// Result type for canvas operations.
pub type CanvasResult<T> = Result<T, CanvasError>;

/// Errors that can occur in canvas operations.
#[derive(Debug, Error)]
pub enum CanvasError {
    /// Object not found on the stage.
    #[error("Object not found: {0}")]
    ObjectNotFound(String),

    /// Frame dimensions outside the accepted range.
    #[error("Invalid frame dimensions: {width}x{height}")]
    InvalidDimensions {
        /// Requested width in pixels.
        width: f32,
        /// Requested height in pixels.
        height: f32,
    },

    /// Canvas content that does not describe a stage-object array.
    #[error("Invalid canvas content: {0}")]
    InvalidContent(String),

    /// Document serialization/deserialization error.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
