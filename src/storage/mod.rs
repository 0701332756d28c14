//! Storage subsystem for SHED.
//!
//! Everything that touches the file tree goes through this module:
//! - Path containment against the configured root ([`resolver`])
//! - Legacy-compatible sanitization of upload paths ([`sanitize`])
//! - Directory-structure reconstruction for bulk uploads ([`upload`])

pub mod resolver;
pub mod sanitize;
pub mod upload;

pub use resolver::PathResolver;
pub use upload::{UploadFile, UploadOutcome, UploadReconstructor};
