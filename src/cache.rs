//! Deduplicated, per-pass load cache.
//!
//! A reference may legitimately be shared by many documents, and duplicate
//! concurrent reads of a changing backing store could observe different
//! bytes, so sharing the *same in-flight load* per target path is a
//! correctness requirement, not an optimization. The cache keys loads by
//! resolved absolute path and hands every caller a clone of the single
//! shared outcome.
//!
//! Entries live for exactly one orchestrator pass: the orchestrator calls
//! [`LoadCache::clear`] at pass start and pass end, so no state leaks between
//! runs and re-running a pass observes fresh file contents.
//!
//! Deduplication uses a [`DashMap`] of shared [`tokio::sync::OnceCell`]
//! cells: the first caller for a path initializes the cell with the
//! read-then-parse operation while concurrent callers await the same
//! initialization instead of issuing their own read.

use dashmap::DashMap;
use serde_json::Value;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::OnceCell;
use tracing::{debug, trace};

use crate::core::DataLoadError;
use crate::format::parse_data;
use crate::reader::FileReader;

/// Outcome of one load, shared by every document referencing the same path.
pub type LoadOutcome = Result<Value, DataLoadError>;

/// Per-pass memoization of target path → load outcome.
#[derive(Debug, Default)]
pub struct LoadCache {
    entries: DashMap<PathBuf, Arc<OnceCell<LoadOutcome>>>,
}

impl LoadCache {
    /// Creates an empty cache.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Drops every cached and in-flight entry.
    pub fn clear(&self) {
        self.entries.clear();
    }

    /// Number of distinct target paths loaded so far in this pass.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the cache holds no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Loads and parses the data file at `path`, deduplicated per pass.
    ///
    /// The first call for a given path reads the file through `reader` and
    /// parses it by extension; every other call for the same path during the
    /// pass shares that operation's outcome.
    ///
    /// # Errors
    ///
    /// Returns [`DataLoadError::Read`] when the file cannot be read, or the
    /// parse failures described in [`parse_data`].
    pub async fn load<R: FileReader>(&self, path: &Path, reader: &R) -> LoadOutcome {
        let cell = Arc::clone(self.entries.entry(path.to_path_buf()).or_default().value());

        cell.get_or_init(|| async {
            debug!("loading data file: {}", path.display());
            let text = match reader.read_to_string(path).await {
                Ok(text) => text,
                Err(err) => {
                    return Err(DataLoadError::Read {
                        path: path.display().to_string(),
                        reason: err.to_string(),
                    });
                }
            };
            trace!("read {} bytes from {}", text.len(), path.display());
            parse_data(path, &text)
        })
        .await
        .clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::future::join_all;
    use serde_json::json;
    use std::collections::HashMap;
    use std::io;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// In-memory reader that counts how often each read is issued.
    struct MemReader {
        files: HashMap<PathBuf, String>,
        reads: AtomicUsize,
    }

    impl MemReader {
        fn new(files: &[(&str, &str)]) -> Self {
            Self {
                files: files
                    .iter()
                    .map(|(path, text)| (PathBuf::from(path), (*text).to_string()))
                    .collect(),
                reads: AtomicUsize::new(0),
            }
        }

        fn read_count(&self) -> usize {
            self.reads.load(Ordering::SeqCst)
        }
    }

    impl FileReader for MemReader {
        async fn read_to_string(&self, path: &Path) -> io::Result<String> {
            self.reads.fetch_add(1, Ordering::SeqCst);
            self.files.get(path).cloned().ok_or_else(|| {
                io::Error::new(io::ErrorKind::NotFound, format!("no such file: {}", path.display()))
            })
        }
    }

    #[tokio::test]
    async fn loads_and_parses_a_file() {
        let reader = MemReader::new(&[("/data/x.json", r#"{"json":true}"#)]);
        let cache = LoadCache::new();

        let value = cache.load(Path::new("/data/x.json"), &reader).await.unwrap();
        assert_eq!(value, json!({"json": true}));
    }

    #[tokio::test]
    async fn concurrent_loads_of_one_path_read_once() {
        let reader = MemReader::new(&[("/data/x.json", r#"{"json":true}"#)]);
        let cache = LoadCache::new();
        let path = Path::new("/data/x.json");

        let outcomes = join_all((0..8).map(|_| cache.load(path, &reader))).await;

        assert_eq!(reader.read_count(), 1);
        for outcome in outcomes {
            assert_eq!(outcome.unwrap(), json!({"json": true}));
        }
    }

    #[tokio::test]
    async fn failures_are_shared_without_retrying() {
        let reader = MemReader::new(&[]);
        let cache = LoadCache::new();
        let path = Path::new("/data/missing.json");

        let first = cache.load(path, &reader).await.unwrap_err();
        let second = cache.load(path, &reader).await.unwrap_err();

        assert_eq!(reader.read_count(), 1);
        assert!(matches!(first, DataLoadError::Read { .. }));
        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn clear_forces_a_fresh_read() {
        let reader = MemReader::new(&[("/data/x.yaml", "yaml: true")]);
        let cache = LoadCache::new();
        let path = Path::new("/data/x.yaml");

        cache.load(path, &reader).await.unwrap();
        assert_eq!(cache.len(), 1);

        cache.clear();
        assert!(cache.is_empty());

        cache.load(path, &reader).await.unwrap();
        assert_eq!(reader.read_count(), 2);
    }

    #[tokio::test]
    async fn distinct_paths_load_independently() {
        let reader =
            MemReader::new(&[("/a.json", r#"{"a":1}"#), ("/b.yaml", "b: 2")]);
        let cache = LoadCache::new();

        let a = cache.load(Path::new("/a.json"), &reader).await.unwrap();
        let b = cache.load(Path::new("/b.yaml"), &reader).await.unwrap();

        assert_eq!(a, json!({"a": 1}));
        assert_eq!(b, json!({"b": 2}));
        assert_eq!(reader.read_count(), 2);
    }
}
