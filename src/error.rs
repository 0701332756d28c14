//! Error types for SHED.

use thiserror::Error;

/// Common error type for SHED.
#[derive(Error, Debug)]
pub enum ShedError {
    /// A resolved path left the configured storage root.
    ///
    /// The payload is the offending logical path as the client supplied it,
    /// never the resolved filesystem path.
    #[error("path escapes storage root: {0}")]
    PathEscape(String),

    /// Resource not found.
    #[error("{0} not found")]
    NotFound(String),

    /// Unparseable or non-positive scale factor.
    #[error("invalid scale factor: {0}")]
    InvalidScale(String),

    /// Validation error for user input.
    #[error("validation error: {0}")]
    Validation(String),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Image re-encoding error.
    ///
    /// Decode failures are not errors (they trigger the pass-through
    /// fallback); this variant covers failures while writing the resized
    /// image back out.
    #[error("image error: {0}")]
    Image(String),

    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),
}

// Conversion from image crate errors (encode path only; decode failures are
// handled explicitly where they occur).
impl From<image::ImageError> for ShedError {
    fn from(e: image::ImageError) -> Self {
        ShedError::Image(e.to_string())
    }
}

/// Result type alias for SHED operations.
pub type Result<T> = std::result::Result<T, ShedError>;
