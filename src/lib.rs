//! SHED - a self-hosted file depot served over HTTP.
//!
//! Files are retrieved by relative path with optional on-the-fly image
//! scaling, and uploaded in bulk with their client-side directory structure
//! preserved. Every path served or written is containment-checked against a
//! single configured storage root.

pub mod config;
pub mod content_type;
pub mod error;
pub mod logging;
pub mod scale;
pub mod storage;
pub mod web;

pub use config::Config;
pub use error::{Result, ShedError};
pub use scale::{maybe_scale, parse_scale_factor, scaled_dimensions, ScaledFile};
pub use storage::{PathResolver, UploadFile, UploadOutcome, UploadReconstructor};
pub use web::WebServer;
