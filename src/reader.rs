//! File-reading seam.
//!
//! The load cache reads through a [`FileReader`] so tests can substitute an
//! in-memory or counting reader; production passes use [`FsReader`], a thin
//! wrapper over [`tokio::fs`].

use std::future::Future;
use std::io;
use std::path::Path;

/// Asynchronous text-file reading primitive.
pub trait FileReader: Send + Sync {
    /// Reads the entire file at `path` as UTF-8 text.
    fn read_to_string(&self, path: &Path) -> impl Future<Output = io::Result<String>> + Send;
}

/// The default reader backed by the real filesystem.
#[derive(Debug, Clone, Copy, Default)]
pub struct FsReader;

impl FileReader for FsReader {
    async fn read_to_string(&self, path: &Path) -> io::Result<String> {
        tokio::fs::read_to_string(path).await
    }
}
