//! Loosely structured key/value attributes of a definition source.
//!
//! ## Learning: Traits at the Boundary
//!
//! The loader only needs "give me attribute X, if any". Putting that
//! behind [`AttributeSource`] lets manifests on disk, in-memory maps in
//! tests, and anything else feed the same typed extraction step.

use langdb_core::SourceId;
use std::collections::BTreeMap;

pub const NAME: &str = "name";
pub const EXTENSIONS: &str = "extensions";
pub const FIRST_LINE_GLOBS: &str = "firstLineGlobs";
pub const MIME_TYPE: &str = "mimetype";
pub const PRIORITY: &str = "priority";
pub const HIDDEN: &str = "hidden";
pub const INDENTER: &str = "indenter";

/// Separator for list-valued attributes.
pub const LIST_SEPARATOR: char = ';';

/// A definition source readable as string attributes.
pub trait AttributeSource {
    /// Identifier stored in the lookup tables for this source.
    fn source_id(&self) -> &SourceId;

    /// Raw value of an attribute, if present.
    fn attribute(&self, key: &str) -> Option<&str>;
}

/// In-memory attribute set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttributeMap {
    source_id: SourceId,
    values: BTreeMap<String, String>,
}

impl AttributeMap {
    pub fn new(source_id: SourceId) -> Self {
        Self {
            source_id,
            values: BTreeMap::new(),
        }
    }

    /// Builder-style insert.
    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.insert(key, value);
        self
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.values.insert(key.into(), value.into());
    }

    pub fn remove(&mut self, key: &str) -> Option<String> {
        self.values.remove(key)
    }

    pub fn set_source_id(&mut self, source_id: SourceId) {
        self.source_id = source_id;
    }
}

impl AttributeSource for AttributeMap {
    fn source_id(&self) -> &SourceId {
        &self.source_id
    }

    fn attribute(&self, key: &str) -> Option<&str> {
        self.values.get(key).map(String::as_str)
    }
}

/// Splits a `;`-separated list, dropping empty items.
pub fn split_list(value: &str) -> Vec<&str> {
    value
        .split(LIST_SEPARATOR)
        .filter(|item| !item.is_empty())
        .collect()
}
