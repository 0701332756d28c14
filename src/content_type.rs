//! Content type lookup for served files.

use std::path::Path;

/// Look up the content type for a file by its extension.
///
/// Unknown or missing extensions fall back to `application/octet-stream`.
pub fn lookup<P: AsRef<Path>>(path: P) -> String {
    mime_guess::from_path(path.as_ref())
        .first_or_octet_stream()
        .to_string()
}

/// Whether a content type denotes an image (and is therefore eligible for
/// scaling).
pub fn is_image(content_type: &str) -> bool {
    content_type.starts_with("image/")
}
