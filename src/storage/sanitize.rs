//! Relative-path sanitization for the upload pipeline.
//!
//! This is a crude, substring-based normalizer kept for compatibility
//! with the clients this service replaced. It is not a
//! containment proof: `a..b` loses its dots, and nothing here understands
//! path components. Every sanitized path must still pass through
//! [`PathResolver`](crate::storage::PathResolver) before it reaches the
//! filesystem; the resolver's component-wise check is the actual boundary.

/// Normalize a client-supplied relative path for upload.
///
/// Applied in order:
/// 1. backslashes become forward slashes
/// 2. every `..` substring is removed, wherever it appears
/// 3. leading slashes are stripped
/// 4. surrounding whitespace is trimmed
///
/// Step 3 running after step 2 matters: removing `..` first means input
/// like `"../x"` collapses to `"x"` instead of surviving as a rooted path.
pub fn strip_traversal_components(raw: &str) -> String {
    let unified = raw.replace('\\', "/");
    let stripped = unified.replace("..", "");
    stripped.trim_start_matches('/').trim().to_string()
}
