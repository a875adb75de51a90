//! Pass orchestration: one full invocation over the working set.
//!
//! A pass clears the load cache, enumerates candidate documents (selected by
//! glob), collects the flat job list (pruning consumed sources as it goes),
//! fires every load eagerly through the deduplicating cache, awaits the whole
//! batch as a structured join, writes settled values back into their slots,
//! clears the cache again, and reports a single aggregated outcome.
//!
//! Failure policy: a pass succeeds only if every required load succeeds.
//! With `ignore_read_failure` set, read and parse failures are skipped per
//! job, leaving the original reference string in place; unknown-format
//! failures still fail the pass. There is no rollback - sibling jobs that
//! settled successfully keep their resolved values even when the pass as a
//! whole reports the first failure.
//!
//! # Example
//!
//! ```rust,no_run
//! use site_data_loader::context::ProjectContext;
//! use site_data_loader::document::WorkingSet;
//! use site_data_loader::loader::{DataLoader, DataLoaderOptions};
//!
//! # async fn example(mut files: WorkingSet) -> anyhow::Result<()> {
//! let options = DataLoaderOptions::default()
//!     .with_data_property("model")
//!     .with_pattern("**/*.html")
//!     .with_remove_source(true);
//!
//! let loader = DataLoader::new(options)?;
//! loader.run(&mut files, &ProjectContext::new("/project", "src")).await?;
//! # Ok(())
//! # }
//! ```

use anyhow::{Context, Result};
use futures::future::join_all;
use glob::{MatchOptions, Pattern};
use serde_json::Value;
use std::path::PathBuf;
use tracing::{debug, trace};

use crate::cache::LoadCache;
use crate::context::ProjectContext;
use crate::core::DataLoadError;
use crate::document::WorkingSet;
use crate::prune::maybe_prune;
use crate::reader::{FileReader, FsReader};
use crate::reference::{Slot, classify};
use crate::resolver::resolve_reference;

/// Configuration for a [`DataLoader`].
///
/// Defaults mirror the conventional site layout: references live under the
/// `data` metadata field, `!` references resolve under `models/` next to the
/// source tree, and every document is a candidate.
#[derive(Debug, Clone)]
pub struct DataLoaderOptions {
    /// Metadata field holding references.
    pub data_property: String,
    /// Model directory for `!`-prefixed references, resolved under the
    /// project root when relative.
    pub directory: String,
    /// Glob selecting candidate documents by working-set key.
    pub pattern: String,
    /// Matching options applied with [`Self::pattern`]. By default `*` stays
    /// within one path component and leading dots must be matched literally;
    /// use [`Self::with_match_options`] to relax either.
    pub match_options: MatchOptions,
    /// Remove in-tree documents consumed as data from the working set.
    pub remove_source: bool,
    /// Tolerate per-job read and parse failures, leaving the reference
    /// string unresolved. Unknown-format failures still fail the pass.
    pub ignore_read_failure: bool,
}

impl Default for DataLoaderOptions {
    fn default() -> Self {
        Self {
            data_property: "data".to_string(),
            directory: "models/".to_string(),
            pattern: "**/*".to_string(),
            match_options: default_match_options(),
            remove_source: false,
            ignore_read_failure: false,
        }
    }
}

/// Dot-files are not candidates and `*` never crosses a path separator
/// unless the caller opts in, matching the conventions of site-generator
/// file matchers (`**` still spans directories).
fn default_match_options() -> MatchOptions {
    MatchOptions {
        case_sensitive: true,
        require_literal_separator: true,
        require_literal_leading_dot: true,
    }
}

impl DataLoaderOptions {
    /// Sets the metadata field holding references.
    #[must_use]
    pub fn with_data_property(mut self, data_property: impl Into<String>) -> Self {
        self.data_property = data_property.into();
        self
    }

    /// Sets the model directory for `!`-prefixed references.
    #[must_use]
    pub fn with_directory(mut self, directory: impl Into<String>) -> Self {
        self.directory = directory.into();
        self
    }

    /// Sets the candidate-selection glob.
    #[must_use]
    pub fn with_pattern(mut self, pattern: impl Into<String>) -> Self {
        self.pattern = pattern.into();
        self
    }

    /// Sets the options applied when matching the glob.
    #[must_use]
    pub fn with_match_options(mut self, match_options: MatchOptions) -> Self {
        self.match_options = match_options;
        self
    }

    /// Enables or disables source pruning.
    #[must_use]
    pub fn with_remove_source(mut self, remove_source: bool) -> Self {
        self.remove_source = remove_source;
        self
    }

    /// Enables or disables tolerating per-job read/parse failures.
    #[must_use]
    pub fn with_ignore_read_failure(mut self, ignore_read_failure: bool) -> Self {
        self.ignore_read_failure = ignore_read_failure;
        self
    }
}

/// One reference to resolve: where it came from, where the value goes, and
/// the target path it loads from.
#[derive(Debug)]
struct Job {
    document: String,
    slot: Slot,
    reference: String,
    target: PathBuf,
}

/// The reference-resolution engine; one instance drives any number of passes.
///
/// The glob is compiled once at construction. The load cache is owned here
/// but scoped to a pass: it is cleared at the start and end of every
/// [`DataLoader::run`].
#[derive(Debug)]
pub struct DataLoader {
    options: DataLoaderOptions,
    pattern: Pattern,
    cache: LoadCache,
}

impl DataLoader {
    /// Creates a loader from `options`, compiling the candidate glob.
    ///
    /// # Errors
    ///
    /// Returns an error if `options.pattern` is not a valid glob.
    pub fn new(options: DataLoaderOptions) -> Result<Self> {
        let pattern = Pattern::new(&options.pattern)
            .with_context(|| format!("invalid match pattern: {}", options.pattern))?;

        Ok(Self {
            options,
            pattern,
            cache: LoadCache::new(),
        })
    }

    /// Runs one pass over `files`, reading data files from the real
    /// filesystem.
    ///
    /// Re-running on already-resolved output is a no-op: no string
    /// references remain, so zero jobs are enumerated.
    ///
    /// # Errors
    ///
    /// Returns the first unrecoverable load failure, wrapped with the
    /// offending reference and referencing document. Values written by
    /// sibling jobs that succeeded are kept.
    pub async fn run(&self, files: &mut WorkingSet, ctx: &ProjectContext) -> Result<()> {
        self.run_with_reader(files, ctx, &FsReader).await
    }

    /// Runs one pass over `files` with an injected [`FileReader`].
    ///
    /// # Errors
    ///
    /// Same as [`DataLoader::run`].
    pub async fn run_with_reader<R: FileReader>(
        &self,
        files: &mut WorkingSet,
        ctx: &ProjectContext,
        reader: &R,
    ) -> Result<()> {
        self.cache.clear();

        let jobs = self.collect_jobs(files, ctx);
        debug!("collected {} data reference jobs", jobs.len());

        // Fire every load eagerly; the cache shares in-flight loads between
        // jobs targeting the same path.
        let outcomes = join_all(jobs.iter().map(|job| self.cache.load(&job.target, reader))).await;

        self.cache.clear();

        let mut first_failure: Option<DataLoadError> = None;
        for (job, outcome) in jobs.into_iter().zip(outcomes) {
            match outcome {
                Ok(value) => self.write_back(files, &job, value),
                Err(err) if self.options.ignore_read_failure && err.is_tolerable() => {
                    debug!("ignoring failed load of '{}' for '{}': {err}", job.reference, job.document);
                }
                Err(err) => {
                    debug!("load of '{}' for '{}' failed: {err}", job.reference, job.document);
                    if first_failure.is_none() {
                        first_failure = Some(DataLoadError::Reference {
                            document: job.document,
                            reference: job.reference,
                            source: Box::new(err),
                        });
                    }
                }
            }
        }

        match first_failure {
            None => Ok(()),
            Some(err) => Err(err.into()),
        }
    }

    /// Enumerates candidate documents and flattens their references into
    /// jobs, pruning consumed sources along the way.
    ///
    /// Keys are snapshotted up front; a document pruned by an earlier job in
    /// the same pass is no longer a candidate when its turn comes.
    fn collect_jobs(&self, files: &mut WorkingSet, ctx: &ProjectContext) -> Vec<Job> {
        let model_dir = ctx.path(&self.options.directory);
        let source_root = ctx.source_root().to_path_buf();

        let keys: Vec<String> = files.keys().cloned().collect();
        let mut jobs = Vec::new();

        for doc_path in keys {
            if !self.pattern.matches_with(&doc_path, self.options.match_options) {
                continue;
            }

            let shape = classify(
                files
                    .get(&doc_path)
                    .and_then(|doc| doc.get(&self.options.data_property)),
            );

            for (slot, reference) in shape.into_jobs() {
                maybe_prune(&doc_path, &reference, files, self.options.remove_source);

                let target = resolve_reference(&doc_path, &reference, &model_dir, &source_root);
                trace!("resolved '{}' + '{}' -> {}", doc_path, reference, target.display());

                jobs.push(Job {
                    document: doc_path.clone(),
                    slot,
                    reference,
                    target,
                });
            }
        }

        jobs
    }

    /// Writes a resolved value into its job's slot.
    ///
    /// A document pruned after its jobs were collected is skipped silently;
    /// it is no longer part of the output set.
    fn write_back(&self, files: &mut WorkingSet, job: &Job, value: Value) {
        let Some(doc) = files.get_mut(&job.document) else {
            trace!("document '{}' was pruned before write-back", job.document);
            return;
        };

        match &job.slot {
            Slot::Field => {
                doc.insert(self.options.data_property.clone(), value);
            }
            Slot::Index(index) => {
                if let Some(Value::Array(items)) = doc.get_mut(&self.options.data_property)
                    && let Some(slot) = items.get_mut(*index)
                {
                    *slot = value;
                }
            }
            Slot::Key(key) => {
                if let Some(Value::Object(entries)) = doc.get_mut(&self.options.data_property)
                    && let Some(slot) = entries.get_mut(key)
                {
                    *slot = value;
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_options_match_conventions() {
        let options = DataLoaderOptions::default();
        assert_eq!(options.data_property, "data");
        assert_eq!(options.directory, "models/");
        assert_eq!(options.pattern, "**/*");
        assert!(!options.remove_source);
        assert!(!options.ignore_read_failure);
        assert!(options.match_options.require_literal_leading_dot);
        assert!(options.match_options.require_literal_separator);
    }

    #[test]
    fn builders_override_defaults() {
        let options = DataLoaderOptions::default()
            .with_data_property("sparkle")
            .with_directory("shared/")
            .with_pattern("**/*.html")
            .with_remove_source(true)
            .with_ignore_read_failure(true);

        assert_eq!(options.data_property, "sparkle");
        assert_eq!(options.directory, "shared/");
        assert_eq!(options.pattern, "**/*.html");
        assert!(options.remove_source);
        assert!(options.ignore_read_failure);
    }

    #[test]
    fn rejects_invalid_glob_patterns() {
        let result = DataLoader::new(DataLoaderOptions::default().with_pattern("a/***"));
        assert!(result.is_err());
    }
}
