//! Extension-dispatched parsing of data-file text.
//!
//! Dispatch is on the literal, case-sensitive path suffix: `.json` is checked
//! first, then `.yaml` and `.yml`. Content is never sniffed and an
//! unsupported extension is always an error, never raw text passed through.
//! Both decoders produce the same [`serde_json::Value`] representation, so
//! the two encodings are interchangeable from the documents' point of view.

use serde_json::Value;
use std::path::Path;
use tracing::debug;

use crate::core::DataLoadError;

/// Parses `text` according to `path`'s extension.
///
/// # Errors
///
/// Returns [`DataLoadError::UnknownFormat`] when the extension matches
/// neither `.json` nor `.yaml`/`.yml`, or [`DataLoadError::Parse`] when the
/// matched decoder rejects the text.
pub fn parse_data(path: &Path, text: &str) -> Result<Value, DataLoadError> {
    debug!("parsing data file: {}", path.display());
    let name = path.to_string_lossy();

    if name.ends_with(".json") {
        serde_json::from_str(text).map_err(|err| DataLoadError::Parse {
            path: path.display().to_string(),
            reason: err.to_string(),
        })
    } else if name.ends_with(".yaml") || name.ends_with(".yml") {
        serde_yaml::from_str(text).map_err(|err| DataLoadError::Parse {
            path: path.display().to_string(),
            reason: err.to_string(),
        })
    } else {
        Err(DataLoadError::UnknownFormat {
            path: path.display().to_string(),
        })
    }
}
