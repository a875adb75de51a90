//! Syntactic resolution of reference strings to absolute target paths.
//!
//! A reference string selects one of three addressing modes through its first
//! character, checked in order:
//!
//! 1. `!rest` - resolved against the model directory, a directory outside the
//!    document tree holding shared data not meant to ship as content.
//! 2. `/rest` - resolved against the root of the source tree.
//! 3. anything else - resolved against the directory containing the
//!    referencing document, as an ordinary relative join (`x`, `./x`, `../x`,
//!    `dir/x` all behave like filesystem-relative includes).
//!
//! Resolution is purely syntactic: no existence check is performed and the
//! result depends only on the inputs.

use std::path::{Component, Path, PathBuf};

/// Resolves a reference string found in `doc_path`'s metadata to the absolute
/// path of the data file it names.
///
/// `doc_path` is the referencing document's slash-separated key in the
/// working set; `model_dir` and `source_root` are absolute directories.
///
/// # Examples
///
/// ```rust
/// use site_data_loader::resolver::resolve_reference;
/// use std::path::Path;
///
/// let models = Path::new("/cwd/models");
/// let src = Path::new("/cwd/src");
///
/// let resolved = resolve_reference("posts/entry.html", "../authors.yaml", models, src);
/// assert_eq!(resolved, Path::new("/cwd/src/authors.yaml"));
///
/// let resolved = resolve_reference("posts/entry.html", "!site.json", models, src);
/// assert_eq!(resolved, Path::new("/cwd/models/site.json"));
/// ```
#[must_use]
pub fn resolve_reference(
    doc_path: &str,
    reference: &str,
    model_dir: &Path,
    source_root: &Path,
) -> PathBuf {
    if let Some(rest) = reference.strip_prefix('!') {
        // Resolve against the model directory
        return normalize_path(&model_dir.join(rest));
    }

    if let Some(rest) = reference.strip_prefix('/') {
        // Resolve against the root of the source tree
        return normalize_path(&source_root.join(rest));
    }

    // Resolve against the directory containing the referencing document
    let parent = Path::new(doc_path).parent().unwrap_or_else(|| Path::new(""));
    normalize_path(&source_root.join(parent).join(reference))
}

/// Normalizes a path by resolving `.` and `..` components lexically.
///
/// No filesystem access; symlinks are not resolved. A `..` at the start of a
/// relative path (or above the root of an absolute one) is dropped.
#[must_use]
pub fn normalize_path(path: &Path) -> PathBuf {
    let mut components = Vec::new();

    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                if matches!(components.last(), Some(Component::Normal(_))) {
                    components.pop();
                }
            }
            c => components.push(c),
        }
    }

    components.iter().collect()
}
