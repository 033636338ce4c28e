//! Definition manifests on disk.
//!
//! A manifest is a TOML file of top-level scalar attributes:
//!
//! ```toml
//! resource = "python.xml"
//! name = "Python"
//! extensions = ["*.py", "*.pyw"]
//! mimetype = "text/x-python"
//! priority = 5
//! indenter = "python"
//! ```
//!
//! Strings are taken as-is, integers and booleans are rendered as text,
//! and string arrays are joined with `;`. The source id is the `resource`
//! attribute when present, otherwise the manifest's file name.

use langdb_core::SourceId;
use std::path::{Path, PathBuf};

use crate::attributes::LIST_SEPARATOR;
use crate::{AttributeMap, LoadError, LoadResult};

/// Attribute naming the resource a manifest describes.
pub const RESOURCE: &str = "resource";

/// Reads one manifest into an attribute map.
pub fn read_manifest(path: &Path) -> LoadResult<AttributeMap> {
    let content = std::fs::read_to_string(path).map_err(|source| LoadError::SourceUnavailable {
        path: path.to_path_buf(),
        source,
    })?;
    parse_manifest(path, &content)
}

/// Parses manifest text; `path` supplies the fallback source id and error context.
pub fn parse_manifest(path: &Path, content: &str) -> LoadResult<AttributeMap> {
    let table: toml::Table = toml::from_str(content).map_err(|source| LoadError::Parse {
        path: path.to_path_buf(),
        source,
    })?;

    let file_name = path
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or_default();
    let mut attributes = AttributeMap::new(SourceId::new(file_name)?);

    for (key, value) in table {
        attributes.insert(key.clone(), render_value(&key, value)?);
    }

    if let Some(resource) = attributes.remove(RESOURCE) {
        attributes.set_source_id(SourceId::new(resource)?);
    }

    Ok(attributes)
}

fn render_value(key: &str, value: toml::Value) -> LoadResult<String> {
    match value {
        toml::Value::String(s) => Ok(s),
        toml::Value::Integer(i) => Ok(i.to_string()),
        toml::Value::Boolean(b) => Ok(b.to_string()),
        toml::Value::Array(items) => {
            let mut parts = Vec::with_capacity(items.len());
            for item in items {
                match item {
                    toml::Value::String(s) => parts.push(s),
                    other => return Err(malformed(key, &other, "list items must be strings")),
                }
            }
            Ok(parts.join(LIST_SEPARATOR.to_string().as_str()))
        }
        other => Err(malformed(key, &other, "unsupported value type")),
    }
}

fn malformed(key: &str, value: &toml::Value, reason: &str) -> LoadError {
    LoadError::MalformedField {
        field: key.to_string(),
        value: value.to_string(),
        reason: reason.to_string(),
    }
}

/// Lists manifest files in `dir` with the given extension, sorted by file name.
///
/// The sort fixes the processing order, which decides equal-priority ties.
pub fn scan_directory(dir: &Path, extension: &str) -> LoadResult<Vec<PathBuf>> {
    let entries = std::fs::read_dir(dir).map_err(|source| LoadError::SourceUnavailable {
        path: dir.to_path_buf(),
        source,
    })?;

    let mut paths: Vec<PathBuf> = entries
        .flatten()
        .map(|entry| entry.path())
        .filter(|path| path.is_file())
        .filter(|path| path.extension().and_then(|e| e.to_str()) == Some(extension))
        .collect();

    paths.sort_by(|a, b| a.file_name().cmp(&b.file_name()));
    tracing::debug!("Found {} manifests in {}", paths.len(), dir.display());
    Ok(paths)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::AttributeSource;
    use tempfile::tempdir;

    #[test]
    fn test_parse_manifest_values() {
        let content = r#"
            resource = "python.xml"
            name = "Python"
            extensions = ["*.py", ".pyw"]
            priority = 5
            hidden = false
        "#;

        let attrs = parse_manifest(Path::new("python.toml"), content).unwrap();
        assert_eq!(attrs.source_id().as_str(), "python.xml");
        assert_eq!(attrs.attribute("extensions"), Some("*.py;.pyw"));
        assert_eq!(attrs.attribute("priority"), Some("5"));
        assert_eq!(attrs.attribute("hidden"), Some("false"));
        assert_eq!(attrs.attribute(RESOURCE), None);
    }

    #[test]
    fn test_source_id_falls_back_to_file_name() {
        let attrs = parse_manifest(Path::new("/defs/c.toml"), "name = \"C\"").unwrap();
        assert_eq!(attrs.source_id().as_str(), "c.toml");
    }

    #[test]
    fn test_unsupported_value_is_malformed() {
        let err = parse_manifest(Path::new("x.toml"), "priority = 1.5").unwrap_err();
        assert!(matches!(err, LoadError::MalformedField { ref field, .. } if field == "priority"));

        let err = parse_manifest(Path::new("x.toml"), "extensions = [1, 2]").unwrap_err();
        assert!(matches!(err, LoadError::MalformedField { .. }));
    }

    #[test]
    fn test_invalid_toml() {
        let err = parse_manifest(Path::new("x.toml"), "name = ").unwrap_err();
        assert!(matches!(err, LoadError::Parse { .. }));
    }

    #[test]
    fn test_missing_file_is_unavailable() {
        let dir = tempdir().unwrap();
        let err = read_manifest(&dir.path().join("nope.toml")).unwrap_err();
        assert!(matches!(err, LoadError::SourceUnavailable { .. }));
    }

    #[test]
    fn test_scan_directory_sorted_and_filtered() {
        let dir = tempdir().unwrap();
        std::fs::write(dir.path().join("b.toml"), "").unwrap();
        std::fs::write(dir.path().join("a.toml"), "").unwrap();
        std::fs::write(dir.path().join("notes.txt"), "").unwrap();
        std::fs::create_dir(dir.path().join("sub.toml")).unwrap();

        let paths = scan_directory(dir.path(), "toml").unwrap();
        let names: Vec<_> = paths
            .iter()
            .map(|p| p.file_name().unwrap().to_str().unwrap().to_string())
            .collect();
        assert_eq!(names, vec!["a.toml", "b.toml"]);
    }

    #[test]
    fn test_scan_missing_directory() {
        let dir = tempdir().unwrap();
        let err = scan_directory(&dir.path().join("missing"), "toml").unwrap_err();
        assert!(matches!(err, LoadError::SourceUnavailable { .. }));
    }
}
