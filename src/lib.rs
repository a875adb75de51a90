//! site-data-loader - metadata reference resolution for static-site builds
//!
//! A single pipeline stage for static-site generators: it scans an in-memory
//! working set of documents, finds metadata fields that are *references* to
//! external structured-data files (JSON or YAML), loads and parses those files,
//! and substitutes the parsed value back into the document metadata in place of
//! the reference string.
//!
//! # Architecture Overview
//!
//! One pass over the working set proceeds in three phases:
//! - **Enumerate**: every document matching the configured glob is inspected;
//!   its reference field is classified as a single reference, an ordered list
//!   of references, or a keyed map of references, producing a flat job list.
//! - **Load**: every job's target path is resolved and all loads are fired
//!   eagerly through a per-pass [`cache::LoadCache`] that guarantees at most
//!   one disk read and parse per target path, no matter how many documents
//!   reference it.
//! - **Write back**: each settled load writes its parsed value into the
//!   originating document slot; the pass succeeds only if every required load
//!   succeeded.
//!
//! # Reference Grammar
//!
//! The first character of a reference string selects the addressing mode:
//!
//! | Reference        | Resolves against                                  |
//! |------------------|---------------------------------------------------|
//! | `!model.yaml`    | the model directory (outside the source tree)     |
//! | `/model.json`    | the root of the source tree                       |
//! | `dir/model.json` | the directory containing the referencing document |
//!
//! # Core Modules
//!
//! - [`loader`] - Pass orchestration, configuration options, and the public
//!   [`loader::DataLoader::run`] entry point
//! - [`cache`] - Deduplicated, per-pass load cache
//! - [`resolver`] - Syntactic reference-to-path resolution
//! - [`format`] - Extension-dispatched JSON/YAML parsing
//! - [`reference`] - Classification of reference field shapes
//! - [`prune`] - Removal of consumed source documents from the working set
//!
//! # Supporting Modules
//!
//! - [`core`] - Error types
//! - [`context`] - Project root/source-directory context
//! - [`document`] - Working-set and document type aliases
//! - [`reader`] - File-reading seam, injectable for tests
//!
//! # Example
//!
//! ```rust,no_run
//! use site_data_loader::context::ProjectContext;
//! use site_data_loader::document::WorkingSet;
//! use site_data_loader::loader::{DataLoader, DataLoaderOptions};
//!
//! # async fn example(mut files: WorkingSet) -> anyhow::Result<()> {
//! let ctx = ProjectContext::new("/project", "src");
//! let loader = DataLoader::new(DataLoaderOptions::default().with_remove_source(true))?;
//!
//! // Replaces every `data` reference in `files` with parsed file contents.
//! loader.run(&mut files, &ctx).await?;
//! # Ok(())
//! # }
//! ```

// Core functionality modules
pub mod cache;
pub mod core;
pub mod loader;

// Reference handling
pub mod format;
pub mod prune;
pub mod reference;
pub mod resolver;

// Supporting modules
pub mod context;
pub mod document;
pub mod reader;
