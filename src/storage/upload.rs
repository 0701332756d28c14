//! Directory-structure reconstruction for bulk uploads.
//!
//! A client uploads a folder as a flat multipart request: repeated `dirs`
//! fields naming the directories (so empty ones survive) and file parts
//! whose names carry the relative path. This module replays that structure
//! under the storage root.

use std::fs;
use std::path::PathBuf;
use std::sync::Arc;

use crate::storage::resolver::PathResolver;
use crate::storage::sanitize::strip_traversal_components;
use crate::{Result, ShedError};

/// One uploaded file: client-relative path plus content.
#[derive(Debug, Clone)]
pub struct UploadFile {
    /// Relative path as supplied by the client (the multipart file name).
    pub relative_path: String,
    /// File content.
    pub content: Vec<u8>,
}

/// Result of a completed upload.
#[derive(Debug, Clone)]
pub struct UploadOutcome {
    /// Absolute directory the upload was rooted at.
    pub saved_to: PathBuf,
    /// Number of files written.
    pub files_written: usize,
    /// Number of explicitly requested directories ensured.
    pub dirs_created: usize,
}

/// A validated write plan. Every target has passed containment; nothing has
/// touched the filesystem yet.
#[derive(Debug)]
struct UploadPlan {
    base_dir: PathBuf,
    dirs: Vec<PathBuf>,
    files: Vec<(PathBuf, Vec<u8>)>,
}

/// Replays a client directory tree under the storage root.
///
/// Reconstruction is two-phase. First every path is sanitized and
/// containment-checked; a rejected entry aborts the upload before the
/// filesystem changes. Then directories are created strictly before any
/// file is written. A filesystem error mid-apply leaves earlier writes in
/// place: uploads are not atomic.
#[derive(Debug, Clone)]
pub struct UploadReconstructor {
    resolver: Arc<PathResolver>,
}

impl UploadReconstructor {
    /// Create a reconstructor writing through the given resolver.
    pub fn new(resolver: Arc<PathResolver>) -> Self {
        Self { resolver }
    }

    /// Reconstruct the uploaded tree under `base_path`.
    ///
    /// # Arguments
    ///
    /// * `base_path` - Target directory relative to the storage root; empty
    ///   means the root itself
    /// * `dirs` - Relative directory paths to create explicitly
    /// * `files` - Files to write, each carrying its client-relative path
    ///
    /// # Returns
    ///
    /// The absolute upload base directory plus counts of what was written.
    pub fn reconstruct(
        &self,
        base_path: &str,
        dirs: &[String],
        files: Vec<UploadFile>,
    ) -> Result<UploadOutcome> {
        let plan = self.plan(base_path, dirs, files)?;
        Self::apply(plan)
    }

    /// Phase one: sanitize and containment-check every target.
    fn plan(
        &self,
        base_path: &str,
        dirs: &[String],
        files: Vec<UploadFile>,
    ) -> Result<UploadPlan> {
        let base = strip_traversal_components(base_path);
        let base_dir = self.resolver.resolve_for_create(&base)?;

        let mut dir_targets = Vec::new();
        for dir in dirs {
            let safe = strip_traversal_components(dir);
            // Entries that sanitize away entirely are dropped, not errors
            if safe.is_empty() {
                continue;
            }
            dir_targets.push(
                self.resolver
                    .resolve_for_create(&join_logical(&base, &safe))?,
            );
        }

        let mut file_targets = Vec::new();
        for file in files {
            let safe = strip_traversal_components(&file.relative_path);
            if safe.is_empty() || safe.ends_with('/') {
                return Err(ShedError::Validation(format!(
                    "invalid file name in upload: {:?}",
                    file.relative_path
                )));
            }
            let target = self
                .resolver
                .resolve_for_create(&join_logical(&base, &safe))?;
            file_targets.push((target, file.content));
        }

        Ok(UploadPlan {
            base_dir,
            dirs: dir_targets,
            files: file_targets,
        })
    }

    /// Phase two: directories strictly before files, then content writes.
    fn apply(plan: UploadPlan) -> Result<UploadOutcome> {
        fs::create_dir_all(&plan.base_dir)?;

        for dir in &plan.dirs {
            fs::create_dir_all(dir)?;
        }

        let files_written = plan.files.len();
        for (target, content) in plan.files {
            if let Some(parent) = target.parent() {
                fs::create_dir_all(parent)?;
            }
            // Overwrites any existing file at the target
            fs::write(&target, content)?;
        }

        Ok(UploadOutcome {
            saved_to: plan.base_dir,
            files_written,
            dirs_created: plan.dirs.len(),
        })
    }
}

/// Join two already-sanitized logical paths.
fn join_logical(base: &str, rest: &str) -> String {
    if base.is_empty() {
        rest.to_string()
    } else {
        format!("{}/{}", base.trim_end_matches('/'), rest)
    }
}
