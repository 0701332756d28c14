//! Response DTOs for Web API.

use serde::Serialize;
use utoipa::ToSchema;

/// Generic API response wrapper.
#[derive(Debug, Serialize)]
pub struct ApiResponse<T: Serialize> {
    /// Response data.
    pub data: T,
}

impl<T: Serialize> ApiResponse<T> {
    /// Create a new API response.
    pub fn new(data: T) -> Self {
        Self { data }
    }
}

/// Upload completion response.
#[derive(Debug, Serialize, ToSchema)]
pub struct UploadResponse {
    /// Completion message.
    pub message: String,
    /// Absolute directory the upload was saved under.
    pub saved_to: String,
}
