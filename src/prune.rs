//! Removal of consumed source documents from the working set.
//!
//! When pruning is enabled, a document whose content was pulled in purely as
//! external data is removed from the working set so it does not ship as site
//! content. Pruning always addresses the reference *within* the document
//! tree, independent of the model/source split used for loading:
//! `!`-prefixed references point outside the tree and are never pruned, a
//! leading `/` is root-relative, anything else is sibling-relative.
//!
//! Pruning runs eagerly when the job is collected, before its load settles,
//! and never fails: a reference pointing at a file that was never part of
//! the working set is a silent no-op.

use std::path::{Path, PathBuf};
use tracing::debug;

use crate::document::WorkingSet;
use crate::resolver::normalize_path;

/// Removes the document consumed by `reference`, if pruning is enabled and a
/// matching working-set entry exists.
pub fn maybe_prune(doc_path: &str, reference: &str, files: &mut WorkingSet, enabled: bool) {
    if !enabled {
        return;
    }

    if reference.starts_with('!') {
        // Model-directory references live outside the tree being pruned
        return;
    }

    let key = tree_key(doc_path, reference);
    if files.remove(&key).is_some() {
        debug!("removed consumed source document: {key}");
    }
}

/// Computes the working-set key a reference addresses within the tree.
fn tree_key(doc_path: &str, reference: &str) -> String {
    let raw = if let Some(rest) = reference.strip_prefix('/') {
        PathBuf::from(rest)
    } else {
        let parent = Path::new(doc_path).parent().unwrap_or_else(|| Path::new(""));
        parent.join(reference)
    };

    let normalized = normalize_path(&raw);
    normalized
        .components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::Document;

    fn working_set(keys: &[&str]) -> WorkingSet {
        keys.iter().map(|key| ((*key).to_string(), Document::new())).collect()
    }

    #[test]
    fn removes_sibling_relative_targets() {
        let mut files = working_set(&["test.html", "test.json", "test2/x", "test2/test2.json"]);

        maybe_prune("test.html", "test.json", &mut files, true);
        maybe_prune("test2/x", "test2.json", &mut files, true);

        assert!(!files.contains_key("test.json"));
        assert!(!files.contains_key("test2/test2.json"));
        assert!(files.contains_key("test.html"));
    }

    #[test]
    fn removes_root_relative_targets() {
        let mut files = working_set(&["a/b", "file.json"]);
        maybe_prune("a/b", "/file.json", &mut files, true);
        assert!(!files.contains_key("file.json"));
    }

    #[test]
    fn resolves_parent_directory_references() {
        let mut files = working_set(&["deep/nested/page", "deep/shared.yaml"]);
        maybe_prune("deep/nested/page", "../shared.yaml", &mut files, true);
        assert!(!files.contains_key("deep/shared.yaml"));
    }

    #[test]
    fn never_prunes_model_directory_references() {
        let mut files = working_set(&["a/b", "file.json", "a/file.json"]);
        maybe_prune("a/b", "!file.json", &mut files, true);
        assert!(files.contains_key("file.json"));
        assert!(files.contains_key("a/file.json"));
    }

    #[test]
    fn missing_target_is_a_silent_no_op() {
        let mut files = working_set(&["a/b"]);
        maybe_prune("a/b", "elsewhere.json", &mut files, true);
        assert_eq!(files.len(), 1);
    }

    #[test]
    fn disabled_pruning_leaves_everything() {
        let mut files = working_set(&["test.html", "test.json"]);
        maybe_prune("test.html", "test.json", &mut files, false);
        assert_eq!(files.len(), 2);
    }
}
