//! Request DTOs for Web API.

use serde::Deserialize;

/// Query parameters for file retrieval.
#[derive(Debug, Deserialize)]
pub struct ScaleQuery {
    /// Scale factor for images: percentage (`"50%"`) or decimal (`"0.5"`).
    /// Blank values are treated as absent.
    pub scale: Option<String>,
}
