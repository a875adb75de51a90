//! Classification of a document's reference field.
//!
//! The configured metadata field may hold a single reference string, an
//! ordered list of reference strings, or a keyed map whose values are all
//! reference strings. Anything else - numbers, booleans, lists or maps with
//! non-string members, an absent field - is opaque: it produces zero jobs,
//! is left exactly as-is, and is never an error.
//!
//! Classification is synchronous and happens once per document per pass,
//! before any load starts, so the orchestrator knows the full job count up
//! front.

use serde_json::Value;

/// The closed set of reference field shapes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReferenceShape {
    /// A single reference, replaced in place by the loaded value.
    Single(String),
    /// An ordered list of references, each replaced at its index.
    List(Vec<String>),
    /// A keyed map of references, each replaced under its key.
    Map(Vec<(String, String)>),
    /// Any other shape; left untouched.
    Opaque,
}

/// Addresses the slot a resolved value is written back into.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Slot {
    /// The reference field itself.
    Field,
    /// An index within a list-valued reference field.
    Index(usize),
    /// A key within a map-valued reference field.
    Key(String),
}

/// Classifies the runtime shape of a reference field's value.
///
/// A list or map containing any non-string member is opaque as a whole.
#[must_use]
pub fn classify(value: Option<&Value>) -> ReferenceShape {
    match value {
        Some(Value::String(reference)) => ReferenceShape::Single(reference.clone()),
        Some(Value::Array(items)) => {
            let mut references = Vec::with_capacity(items.len());
            for item in items {
                match item {
                    Value::String(reference) => references.push(reference.clone()),
                    _ => return ReferenceShape::Opaque,
                }
            }
            ReferenceShape::List(references)
        }
        Some(Value::Object(entries)) => {
            let mut references = Vec::with_capacity(entries.len());
            for (key, item) in entries {
                match item {
                    Value::String(reference) => references.push((key.clone(), reference.clone())),
                    _ => return ReferenceShape::Opaque,
                }
            }
            ReferenceShape::Map(references)
        }
        _ => ReferenceShape::Opaque,
    }
}

impl ReferenceShape {
    /// Flattens the shape into `(slot, reference)` jobs.
    #[must_use]
    pub fn into_jobs(self) -> Vec<(Slot, String)> {
        match self {
            Self::Single(reference) => vec![(Slot::Field, reference)],
            Self::List(references) => references
                .into_iter()
                .enumerate()
                .map(|(index, reference)| (Slot::Index(index), reference))
                .collect(),
            Self::Map(references) => references
                .into_iter()
                .map(|(key, reference)| (Slot::Key(key), reference))
                .collect(),
            Self::Opaque => Vec::new(),
        }
    }
}
