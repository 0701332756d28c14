//! Path containment for SHED.
//!
//! Every filesystem path SHED serves or writes is produced by
//! [`PathResolver`], which joins an untrusted relative path onto the
//! configured storage root and proves the result stays inside it.

use std::fs;
use std::io;
use std::path::{Component, Path, PathBuf};

use crate::{Result, ShedError};

/// Resolves untrusted relative paths against the storage root.
///
/// Containment is checked lexically before any filesystem access, so a
/// request that escapes the root is rejected without revealing whether its
/// target exists. Read resolution additionally canonicalizes the surviving
/// path and re-checks containment, which catches symlinks pointing outside
/// the root.
#[derive(Debug, Clone)]
pub struct PathResolver {
    /// Canonicalized storage root.
    root: PathBuf,
    /// Whether containment comparison is case-sensitive.
    case_sensitive: bool,
}

impl PathResolver {
    /// Create a resolver rooted at `root`.
    ///
    /// The root directory is created if it doesn't exist, then
    /// canonicalized so later comparisons run against the real path.
    pub fn new(root: impl Into<PathBuf>, case_sensitive: bool) -> Result<Self> {
        let root = root.into();
        fs::create_dir_all(&root)?;
        let root = fs::canonicalize(&root)?;

        Ok(Self {
            root,
            case_sensitive,
        })
    }

    /// The canonical storage root.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Resolve a relative path for reading.
    ///
    /// The containment check runs before the existence check, so an
    /// escaping request learns nothing about files outside the root.
    ///
    /// # Returns
    ///
    /// The canonical path of an existing regular file under the root.
    /// Directories resolve to `NotFound`: read targets are files.
    pub fn resolve(&self, relative: &str) -> Result<PathBuf> {
        let candidate = lexical_normalize(&self.root.join(relative));
        if !path_has_prefix(&candidate, &self.root, self.case_sensitive) {
            return Err(ShedError::PathEscape(relative.to_string()));
        }

        let real = match fs::canonicalize(&candidate) {
            Ok(p) => p,
            // NotADirectory covers paths that descend through a file,
            // like "a.txt/nested"
            Err(e)
                if matches!(
                    e.kind(),
                    io::ErrorKind::NotFound | io::ErrorKind::NotADirectory
                ) =>
            {
                return Err(ShedError::NotFound(format!("File: {relative}")));
            }
            Err(e) => return Err(e.into()),
        };

        // A symlink under the root may point anywhere; the canonical path
        // must pass the same check
        if !path_has_prefix(&real, &self.root, self.case_sensitive) {
            return Err(ShedError::PathEscape(relative.to_string()));
        }

        if !real.is_file() {
            return Err(ShedError::NotFound(format!("File: {relative}")));
        }

        Ok(real)
    }

    /// Resolve a relative path for creation.
    ///
    /// Lexical containment only; the target need not exist. The root itself
    /// (`relative == ""`) is a valid result, used as the default upload
    /// base.
    pub fn resolve_for_create(&self, relative: &str) -> Result<PathBuf> {
        let candidate = lexical_normalize(&self.root.join(relative));
        if !path_has_prefix(&candidate, &self.root, self.case_sensitive) {
            return Err(ShedError::PathEscape(relative.to_string()));
        }

        Ok(candidate)
    }
}

/// Lexically resolve `.` and `..` components without touching the
/// filesystem.
///
/// `..` pops the previous component and clamps at the filesystem root, the
/// same way absolute paths normalize on every platform. Inputs are expected
/// to be absolute (the result of joining onto the resolver root).
fn lexical_normalize(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::Prefix(_) | Component::RootDir => out.push(component.as_os_str()),
            Component::CurDir => {}
            Component::ParentDir => {
                // pop() stops at the filesystem root, so `..` cannot climb
                // above it
                out.pop();
            }
            Component::Normal(part) => out.push(part),
        }
    }
    out
}

/// Component-wise prefix check.
///
/// Raw string prefixing would treat `/data-old` as inside `/data`;
/// components are compared whole. The case-insensitive mode folds via lossy
/// UTF-8, which is adequate for the Windows-style roots the option exists
/// for.
fn path_has_prefix(path: &Path, prefix: &Path, case_sensitive: bool) -> bool {
    if case_sensitive {
        return path.starts_with(prefix);
    }

    let mut have = path.components();
    for want in prefix.components() {
        match have.next() {
            Some(got) => {
                let want = want.as_os_str().to_string_lossy().to_lowercase();
                let got = got.as_os_str().to_string_lossy().to_lowercase();
                if want != got {
                    return false;
                }
            }
            None => return false,
        }
    }
    true
}
