//! Project context: the root directory, the source tree within it, and the
//! path-joining primitive the resolver builds on.
//!
//! The context is handed in by the host pipeline alongside the working set.
//! Both the source directory and the configured model directory are resolved
//! under the project root when given as relative paths, matching how site
//! generators lay out `src/` and auxiliary directories next to each other.

use std::path::{Path, PathBuf};

use crate::resolver::normalize_path;

/// Root/source-directory configuration for one build.
///
/// # Examples
///
/// ```rust
/// use site_data_loader::context::ProjectContext;
/// use std::path::Path;
///
/// let ctx = ProjectContext::new("/project", "src");
/// assert_eq!(ctx.source_root(), Path::new("/project/src"));
/// assert_eq!(ctx.path("models/"), Path::new("/project/models"));
/// ```
#[derive(Debug, Clone)]
pub struct ProjectContext {
    root: PathBuf,
    source_root: PathBuf,
}

impl ProjectContext {
    /// Creates a context from the project root and its source directory.
    ///
    /// `source` may be absolute or relative to `root`.
    pub fn new(root: impl Into<PathBuf>, source: impl AsRef<Path>) -> Self {
        let root = normalize_path(&root.into());
        let source_root = normalize_path(&root.join(source.as_ref()));
        Self { root, source_root }
    }

    /// The project root directory.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// The absolute root of the source tree, target of `/`-prefixed
    /// references.
    #[must_use]
    pub fn source_root(&self) -> &Path {
        &self.source_root
    }

    /// Joins a path under the project root, normalizing `.` and `..`
    /// components. Absolute paths are normalized and returned as-is.
    #[must_use]
    pub fn path(&self, rel: impl AsRef<Path>) -> PathBuf {
        let rel = rel.as_ref();
        if rel.is_absolute() {
            normalize_path(rel)
        } else {
            normalize_path(&self.root.join(rel))
        }
    }
}
