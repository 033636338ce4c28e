//! Hand-authored first-line overrides.
//!
//! Overrides are policy, not priority: they run after the tables are
//! frozen and replace whatever the competition produced.

use serde::{Deserialize, Serialize};

use crate::{SignalKind, SourceId, SyntaxDatabase};

/// First-line glob claimed by the PHP override.
pub const PHP_FIRST_LINE: &str = "<?php*";

/// Source the PHP first line is forced to. It is derived from the HTML
/// definition, which never advertises `<?php` itself.
pub const PHP_SOURCE: &str = "html-php.xml";

/// Forces one first-line glob to a specific source.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Override {
    pub first_line_glob: String,
    pub source_id: SourceId,
}

impl Override {
    pub fn new(first_line_glob: impl Into<String>, source_id: SourceId) -> Self {
        Self {
            first_line_glob: first_line_glob.into(),
            source_id,
        }
    }
}

/// Overrides that are always applied, last.
pub fn builtin_overrides() -> Vec<Override> {
    vec![Override {
        first_line_glob: PHP_FIRST_LINE.to_string(),
        source_id: SourceId::from_static(PHP_SOURCE),
    }]
}

/// Applies `extra` overrides and then the built-in ones, so built-ins win.
pub fn apply_overrides(db: &mut SyntaxDatabase, extra: &[Override]) {
    for rule in extra.iter().cloned().chain(builtin_overrides()) {
        let previous = db
            .table_mut(SignalKind::FirstLine)
            .insert(rule.first_line_glob.clone(), rule.source_id.clone());

        match previous {
            Some(previous) if previous != rule.source_id => {
                tracing::debug!(
                    "Override '{}': {} replaces {}",
                    rule.first_line_glob,
                    rule.source_id,
                    previous
                );
            }
            None => {
                tracing::debug!("Override '{}': {}", rule.first_line_glob, rule.source_id);
            }
            Some(_) => {}
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
    fn test_builtin_override_inserted() {
        let mut db = SyntaxDatabase::default();
        apply_overrides(&mut db, &[]);
        assert_eq!(db.lookup(SignalKind::FirstLine, PHP_FIRST_LINE), Some(&id(PHP_SOURCE)));
    }

    #[test]
    fn test_builtin_wins_over_extra() {
        let mut db = SyntaxDatabase::default();
        let extra = [Override::new(PHP_FIRST_LINE, id("php.xml"))];
        apply_overrides(&mut db, &extra);
        assert_eq!(db.lookup(SignalKind::FirstLine, PHP_FIRST_LINE), Some(&id(PHP_SOURCE)));
    }

    #[test]
    fn test_extra_override_replaces_resolved_entry() {
        let mut db = SyntaxDatabase::default();
        db.table_mut(SignalKind::FirstLine)
            .insert("#!*perl*".to_string(), id("perl.xml"));

        apply_overrides(&mut db, &[Override::new("#!*perl*", id("raku.xml"))]);
        assert_eq!(db.lookup(SignalKind::FirstLine, "#!*perl*"), Some(&id("raku.xml")));
    }

    #[test]
    fn test_override_with_empty_source_fails_to_parse() {
        let parsed =
            serde_json::from_str::<Override>(r##"{"first_line_glob":"#!*perl*","source_id":""}"##);
        assert!(parsed.is_err());

        let parsed =
            serde_json::from_str::<Override>(r##"{"first_line_glob":"#!*perl*","source_id":"perl.xml"}"##)
                .unwrap();
        assert_eq!(parsed, Override::new("#!*perl*", id("perl.xml")));
    }

    #[test]
    fn test_overrides_touch_only_first_lines() {
        let mut db = SyntaxDatabase::default();
        apply_overrides(&mut db, &[]);
        assert!(db.names().is_empty());
        assert!(db.extensions().is_empty());
        assert!(db.mime_types().is_empty());
    }
}
