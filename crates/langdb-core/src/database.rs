//! The resolved lookup tables.
//!
//! ## Learning: Ordered Maps for Reproducible Output
//!
//! `HashMap` iteration order changes between runs. The database is
//! emitted as generated source, so it uses `BTreeMap` everywhere:
//! the same resolved content always serializes to the same bytes.

use serde::Serialize;
use std::collections::BTreeMap;

use crate::SourceId;

/// The four signals an editor uses to pick a language.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum SignalKind {
    Name,
    MimeType,
    Extension,
    FirstLine,
}

impl SignalKind {
    /// All signal kinds, in table order.
    pub const ALL: [SignalKind; 4] = [
        SignalKind::Name,
        SignalKind::MimeType,
        SignalKind::Extension,
        SignalKind::FirstLine,
    ];

    /// Human-readable label used in logs.
    pub fn label(&self) -> &'static str {
        match self {
            SignalKind::Name => "name",
            SignalKind::MimeType => "mime type",
            SignalKind::Extension => "extension",
            SignalKind::FirstLine => "first line",
        }
    }
}

impl std::fmt::Display for SignalKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// A signal -> source table with exactly one source per key.
pub type SignalTable = BTreeMap<String, SourceId>;

/// Final, immutable language lookup database.
///
/// Built by [`crate::aggregate`]; there is no mutation API once built.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SyntaxDatabase {
    pub(crate) names: SignalTable,
    pub(crate) mime_types: SignalTable,
    pub(crate) extensions: SignalTable,
    pub(crate) first_lines: SignalTable,
    pub(crate) indenters: BTreeMap<SourceId, String>,
}

impl SyntaxDatabase {
    /// Display name -> source.
    pub fn names(&self) -> &SignalTable {
        &self.names
    }

    /// MIME type -> source.
    pub fn mime_types(&self) -> &SignalTable {
        &self.mime_types
    }

    /// Extension glob -> source.
    pub fn extensions(&self) -> &SignalTable {
        &self.extensions
    }

    /// First-line glob -> source.
    pub fn first_lines(&self) -> &SignalTable {
        &self.first_lines
    }

    /// Source -> indenter, only for sources that declared one.
    pub fn indenters(&self) -> &BTreeMap<SourceId, String> {
        &self.indenters
    }

    /// Returns the table for a signal kind.
    pub fn table(&self, kind: SignalKind) -> &SignalTable {
        match kind {
            SignalKind::Name => &self.names,
            SignalKind::MimeType => &self.mime_types,
            SignalKind::Extension => &self.extensions,
            SignalKind::FirstLine => &self.first_lines,
        }
    }

    /// Looks up the source resolved for a signal value.
    ///
    /// This is an exact key lookup; glob matching belongs to the editor runtime.
    pub fn lookup(&self, kind: SignalKind, value: &str) -> Option<&SourceId> {
        self.table(kind).get(value)
    }

    /// Returns the indenter a source declared, if any.
    pub fn indenter(&self, source: &SourceId) -> Option<&str> {
        self.indenters.get(source).map(String::as_str)
    }

    /// Total number of entries across all five tables.
    pub fn len(&self) -> usize {
        SignalKind::ALL
            .iter()
            .map(|kind| self.table(*kind).len())
            .sum::<usize>()
            + self.indenters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub(crate) fn table_mut(&mut self, kind: SignalKind) -> &mut SignalTable {
        match kind {
            SignalKind::Name => &mut self.names,
            SignalKind::MimeType => &mut self.mime_types,
            SignalKind::Extension => &mut self.extensions,
            SignalKind::FirstLine => &mut self.first_lines,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn id(s: &str) -> SourceId {
        SourceId::new(s).unwrap()
    }

    #[test]
    fn test_empty_database() {
        let db = SyntaxDatabase::default();
        assert!(db.is_empty());
        assert!(db.lookup(SignalKind::Extension, "*.rs").is_none());
    }

    #[test]
    fn test_lookup_and_len() {
        let mut db = SyntaxDatabase::default();
        db.table_mut(SignalKind::Extension)
            .insert("*.rs".to_string(), id("rust.xml"));
        db.indenters.insert(id("rust.xml"), "cstyle".to_string());

        assert_eq!(db.lookup(SignalKind::Extension, "*.rs"), Some(&id("rust.xml")));
        assert_eq!(db.indenter(&id("rust.xml")), Some("cstyle"));
        assert_eq!(db.len(), 2);
    }

    #[test]
    fn test_serialization_is_sorted() {
        let mut db = SyntaxDatabase::default();
        db.table_mut(SignalKind::Name)
            .insert("Rust".to_string(), id("rust.xml"));
        db.table_mut(SignalKind::Name)
            .insert("C".to_string(), id("c.xml"));

        let json = serde_json::to_string(&db).unwrap();
        let c = json.find("\"C\"").unwrap();
        let rust = json.find("\"Rust\"").unwrap();
        assert!(c < rust);
    }
}
