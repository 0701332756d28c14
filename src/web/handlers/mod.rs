//! API handlers for SHED.

pub mod file;

use std::sync::Arc;

use crate::config::Config;
use crate::storage::PathResolver;
use crate::Result;

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    /// Path resolver rooted at the storage directory.
    pub resolver: Arc<PathResolver>,
    /// Maximum size of a single uploaded file in bytes.
    pub max_upload_size: u64,
    /// Cache-Control max-age for served files, in seconds.
    pub cache_max_age: u64,
}

impl AppState {
    /// Build the shared state from configuration.
    ///
    /// Creates the storage root if it doesn't exist yet.
    pub fn from_config(config: &Config) -> Result<Self> {
        let resolver = PathResolver::new(
            &config.storage.root,
            config.storage.case_sensitive_paths,
        )?;

        Ok(Self {
            resolver: Arc::new(resolver),
            max_upload_size: config.server.max_upload_size_mb * 1024 * 1024,
            cache_max_age: config.server.cache_max_age_secs,
        })
    }
}
