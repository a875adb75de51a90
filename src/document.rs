//! Working-set and document types.
//!
//! The host pipeline owns the document set; this crate only reads and writes
//! the one configured reference field per document and may remove whole
//! documents when source pruning is enabled.

use serde_json::Value;
use std::collections::BTreeMap;

/// A document's metadata mapping.
///
/// The shape of everything except the configured reference field is
/// unmodeled; values pass through untouched.
pub type Document = serde_json::Map<String, Value>;

/// The mutable working set handed in by the host pipeline, keyed by
/// slash-separated relative document path.
pub type WorkingSet = BTreeMap<String, Document>;
