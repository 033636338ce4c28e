//! Normalized syntax-definition records.
//!
//! ## Learning: Newtypes for Identifiers
//!
//! `SourceId` wraps a `String`. The lookup tables store source
//! identifiers as values and signal strings as keys; giving the
//! identifier its own type keeps the two from being swapped by accident.

use serde::{Deserialize, Serialize};

use crate::{RecordError, RecordResult};

/// Identifier of the definition source a record came from (usually a file name).
///
/// Deserialization goes through [`SourceId::new`], so an empty id in a
/// config file is a parse error.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct SourceId(String);

impl SourceId {
    /// Creates a source identifier. Empty identifiers are rejected.
    pub fn new(id: impl Into<String>) -> RecordResult<Self> {
        let id = id.into();
        if id.is_empty() {
            return Err(RecordError::EmptySourceId);
        }
        Ok(Self(id))
    }

    /// Creates an identifier from a compile-time constant.
    pub fn from_static(id: &'static str) -> Self {
        debug_assert!(!id.is_empty(), "source identifier must not be empty");
        Self(id.to_string())
    }

    /// Returns the identifier as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Splits the identifier into stem and extension, e.g. `html.xml` -> (`html`, `xml`).
    pub fn split_extension(&self) -> (&str, Option<&str>) {
        match self.0.rsplit_once('.') {
            Some((stem, ext)) if !stem.is_empty() => (stem, Some(ext)),
            _ => (&self.0, None),
        }
    }
}

impl std::fmt::Display for SourceId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for SourceId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for SourceId {
    type Error = RecordError;

    fn try_from(id: String) -> RecordResult<Self> {
        Self::new(id)
    }
}

impl From<SourceId> for String {
    fn from(id: SourceId) -> Self {
        id.0
    }
}

/// Ensures an extension glob contains a wildcard.
///
/// A pattern without `*` gets one prepended verbatim: `.py` becomes `*.py`
/// and `txt` becomes `*txt` (no separator is inserted). Patterns that already
/// contain a wildcard anywhere are returned unchanged.
pub fn fix_extension(extension: &str) -> String {
    if extension.contains('*') {
        extension.to_string()
    } else {
        format!("*{extension}")
    }
}

/// One syntax definition, reduced to the signals used for language lookup.
///
/// Records are immutable once built; use [`SyntaxRecord::builder`] to create one.
/// Not `Deserialize`: records only come from the builder.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SyntaxRecord {
    name: String,
    extensions: Vec<String>,
    first_line_globs: Vec<String>,
    mime_types: Vec<String>,
    priority: i64,
    hidden: bool,
    indenter: Option<String>,
    source_id: SourceId,
}

impl SyntaxRecord {
    /// Starts building a record for the given source.
    pub fn builder(source_id: SourceId, name: impl Into<String>) -> SyntaxRecordBuilder {
        SyntaxRecordBuilder {
            record: SyntaxRecord {
                name: name.into(),
                extensions: Vec::new(),
                first_line_globs: Vec::new(),
                mime_types: Vec::new(),
                priority: 0,
                hidden: false,
                indenter: None,
                source_id,
            },
        }
    }

    /// Display name of the language or dialect.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Extension globs, each containing a wildcard.
    pub fn extensions(&self) -> &[String] {
        &self.extensions
    }

    /// Globs matched against the first line of a file.
    pub fn first_line_globs(&self) -> &[String] {
        &self.first_line_globs
    }

    pub fn mime_types(&self) -> &[String] {
        &self.mime_types
    }

    /// Conflict priority; higher wins.
    pub fn priority(&self) -> i64 {
        self.priority
    }

    /// Whether the definition should be hidden from language menus.
    pub fn hidden(&self) -> bool {
        self.hidden
    }

    pub fn indenter(&self) -> Option<&str> {
        self.indenter.as_deref()
    }

    pub fn source_id(&self) -> &SourceId {
        &self.source_id
    }
}

/// Builder for [`SyntaxRecord`].
#[derive(Debug, Clone)]
pub struct SyntaxRecordBuilder {
    record: SyntaxRecord,
}

impl SyntaxRecordBuilder {
    /// Adds extension globs; each is passed through [`fix_extension`].
    pub fn extensions<I, S>(mut self, extensions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.record
            .extensions
            .extend(extensions.into_iter().map(|ext| fix_extension(ext.as_ref())));
        self
    }

    pub fn first_line_globs<I, S>(mut self, globs: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.record
            .first_line_globs
            .extend(globs.into_iter().map(Into::into));
        self
    }

    pub fn mime_types<I, S>(mut self, mime_types: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.record
            .mime_types
            .extend(mime_types.into_iter().map(Into::into));
        self
    }

    pub fn priority(mut self, priority: i64) -> Self {
        self.record.priority = priority;
        self
    }

    pub fn hidden(mut self, hidden: bool) -> Self {
        self.record.hidden = hidden;
        self
    }

    pub fn indenter(mut self, indenter: Option<String>) -> Self {
        self.record.indenter = indenter;
        self
    }

    /// Finishes the record. Fails if the name is empty.
    pub fn build(self) -> RecordResult<SyntaxRecord> {
        if self.record.name.is_empty() {
            return Err(RecordError::EmptyName(self.record.source_id));
        }
        Ok(self.record)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn id(s: &str) -> SourceId {
        SourceId::new(s).unwrap()
    }

    #[test]
    fn test_fix_extension_prepends_wildcard() {
        assert_eq!(fix_extension(".py"), "*.py");
        assert_eq!(fix_extension("txt"), "*txt");
    }

    #[test]
    fn test_fix_extension_keeps_existing_wildcard() {
        assert_eq!(fix_extension("*.py"), "*.py");
        assert_eq!(fix_extension("foo*.py"), "foo*.py");
        assert_eq!(fix_extension("Makefile*"), "Makefile*");
    }

    #[test]
    fn test_builder_defaults() {
        let record = SyntaxRecord::builder(id("python.xml"), "Python")
            .build()
            .unwrap();
        assert_eq!(record.priority(), 0);
        assert!(!record.hidden());
        assert!(record.indenter().is_none());
        assert!(record.extensions().is_empty());
    }

    #[test]
    fn test_builder_normalizes_extensions() {
        let record = SyntaxRecord::builder(id("python.xml"), "Python")
            .extensions([".py", "*.pyw"])
            .build()
            .unwrap();
        assert_eq!(record.extensions(), ["*.py", "*.pyw"]);
    }

    #[test]
    fn test_empty_name_rejected() {
        let err = SyntaxRecord::builder(id("a.xml"), "").build().unwrap_err();
        assert!(matches!(err, RecordError::EmptyName(_)));
    }

    #[test]
    fn test_empty_source_id_rejected() {
        assert!(matches!(SourceId::new(""), Err(RecordError::EmptySourceId)));
    }

    #[test]
    fn test_source_id_serde_is_a_plain_string() {
        assert_eq!(serde_json::to_string(&id("html.xml")).unwrap(), "\"html.xml\"");
        let parsed: SourceId = serde_json::from_str("\"html.xml\"").unwrap();
        assert_eq!(parsed, id("html.xml"));
    }

    #[test]
    fn test_empty_source_id_fails_to_deserialize() {
        let err = serde_json::from_str::<SourceId>("\"\"").unwrap_err();
        assert!(err.to_string().contains("must not be empty"));
    }

    #[test]
    fn test_split_extension() {
        assert_eq!(id("html.xml").split_extension(), ("html", Some("xml")));
        assert_eq!(id("Makefile").split_extension(), ("Makefile", None));
        assert_eq!(id(".hidden").split_extension(), (".hidden", None));
    }

    proptest! {
        #[test]
        fn fix_extension_is_idempotent(ext in ".{0,12}") {
            let once = fix_extension(&ext);
            prop_assert_eq!(fix_extension(&once), once.clone());
            prop_assert!(once.contains('*'));
        }
    }
}
