//! Error handling for data-reference loading.
//!
//! Every failure mode of a single load funnels into [`DataLoadError`]:
//! the file could not be read, its extension matched no known decoder, or the
//! matched decoder rejected the text. The orchestrator treats all three
//! identically as "load failure"; they are distinguished only by message for
//! diagnostics.
//!
//! Variants carry their underlying cause as a formatted `String` rather than a
//! source error value so that a completed load outcome can be cloned out of
//! the shared per-pass cache by every document that referenced the same file.
//!
//! # Tolerated failures
//!
//! When a pass runs with `ignore_read_failure`, read and parse failures are
//! skipped per job and the affected field keeps its unresolved reference
//! string. An unrecognized extension is a configuration mistake, not a bad
//! backing file, so [`DataLoadError::UnknownFormat`] always fails the pass.
//! [`DataLoadError::is_tolerable`] encodes that distinction.
//!
//! # Examples
//!
//! ```rust
//! use site_data_loader::core::DataLoadError;
//!
//! let err = DataLoadError::UnknownFormat { path: "data/list.txt".into() };
//! assert!(!err.is_tolerable());
//! assert_eq!(err.to_string(), "unknown data format: data/list.txt");
//! ```

use thiserror::Error;

/// The error type for a single data-file load.
///
/// `Read`, `UnknownFormat`, and `Parse` are produced inside the load cache;
/// `Reference` is the context wrap the orchestrator applies before reporting
/// a pass failure, naming the offending reference and the document that
/// declared it.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum DataLoadError {
    /// The target file could not be read (missing, permissions, etc.).
    #[error("failed to read data file {path}: {reason}")]
    Read {
        /// Resolved path of the data file
        path: String,
        /// The underlying I/O error, formatted
        reason: String,
    },

    /// The target path's extension matched neither `.json` nor `.yaml`/`.yml`.
    ///
    /// Content is never sniffed and raw text is never passed through, so an
    /// unsupported extension is always an error.
    #[error("unknown data format: {path}")]
    UnknownFormat {
        /// Resolved path of the data file
        path: String,
    },

    /// The file was read but its decoder rejected the text.
    #[error("failed to parse data file {path}: {reason}")]
    Parse {
        /// Resolved path of the data file
        path: String,
        /// The decoder's error message
        reason: String,
    },

    /// A load failure wrapped with the reference that triggered it and the
    /// document that holds the reference.
    #[error("failed to load data reference '{reference}' for document '{document}'")]
    Reference {
        /// Working-set key of the referencing document
        document: String,
        /// The reference string as written in the document's metadata
        reference: String,
        /// The underlying load failure
        #[source]
        source: Box<DataLoadError>,
    },
}

impl DataLoadError {
    /// Whether `ignore_read_failure` may skip this failure.
    ///
    /// Read and parse failures are per-file problems the pass can proceed
    /// past; an unrecognized format fails the pass unconditionally.
    #[must_use]
    pub fn is_tolerable(&self) -> bool {
        match self {
            Self::Read { .. } | Self::Parse { .. } => true,
            Self::UnknownFormat { .. } => false,
            Self::Reference { source, .. } => source.is_tolerable(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn read_and_parse_failures_are_tolerable() {
        let read = DataLoadError::Read {
            path: "a/b.json".into(),
            reason: "No such file or directory".into(),
        };
        let parse = DataLoadError::Parse {
            path: "a/b.json".into(),
            reason: "expected value at line 1".into(),
        };
        assert!(read.is_tolerable());
        assert!(parse.is_tolerable());
    }

    #[test]
    fn unknown_format_is_never_tolerable() {
        let err = DataLoadError::UnknownFormat {
            path: "a/b.txt".into(),
        };
        assert!(!err.is_tolerable());
    }

    #[test]
    fn reference_wrap_defers_to_its_source() {
        let err = DataLoadError::Reference {
            document: "posts/index.html".into(),
            reference: "authors.yaml".into(),
            source: Box::new(DataLoadError::UnknownFormat {
                path: "authors.txt".into(),
            }),
        };
        assert!(!err.is_tolerable());
    }

    #[test]
    fn reference_wrap_names_document_and_reference() {
        let err = DataLoadError::Reference {
            document: "posts/index.html".into(),
            reference: "!shared/authors.yaml".into(),
            source: Box::new(DataLoadError::Read {
                path: "/project/models/shared/authors.yaml".into(),
                reason: "permission denied".into(),
            }),
        };
        let message = err.to_string();
        assert!(message.contains("posts/index.html"));
        assert!(message.contains("!shared/authors.yaml"));
    }
}
