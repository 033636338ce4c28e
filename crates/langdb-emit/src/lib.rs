//! # Langdb Emit
//!
//! Serializes a [`SyntaxDatabase`] for consumption by the editor.
//!
//! Every format walks the same five tables in the same order, and the
//! tables are ordered maps, so output is byte-identical for identical
//! databases.

mod qmap;

use langdb_core::{SourceId, SyntaxDatabase};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::io::Write;
use std::path::Path;
use std::str::FromStr;

pub use qmap::write_qmap;

/// Result type for emission
pub type EmitResult<T> = Result<T, EmitError>;

/// Errors that can occur while writing a database
#[derive(Debug, thiserror::Error)]
pub enum EmitError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML error: {0}")]
    Toml(#[from] toml::ser::Error),

    #[error("Unknown output format: {0}")]
    UnknownFormat(String),
}

/// Output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Format {
    /// C++ source defining one `QMap<QString,QString>` per table.
    #[default]
    Qmap,
    Json,
    Toml,
}

impl FromStr for Format {
    type Err = EmitError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "qmap" | "cpp" => Ok(Format::Qmap),
            "json" => Ok(Format::Json),
            "toml" => Ok(Format::Toml),
            _ => Err(EmitError::UnknownFormat(s.to_string())),
        }
    }
}

impl std::fmt::Display for Format {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Format::Qmap => "qmap",
            Format::Json => "json",
            Format::Toml => "toml",
        })
    }
}

/// The five tables under the names the editor runtime looks up.
#[derive(Debug, Serialize)]
pub struct TableSet<'a> {
    #[serde(rename = "languageNameToXmlFileName")]
    pub names: &'a BTreeMap<String, SourceId>,
    #[serde(rename = "mimeTypeToXmlFileName")]
    pub mime_types: &'a BTreeMap<String, SourceId>,
    #[serde(rename = "extensionToXmlFileName")]
    pub extensions: &'a BTreeMap<String, SourceId>,
    #[serde(rename = "firstLineToXmlFileName")]
    pub first_lines: &'a BTreeMap<String, SourceId>,
    #[serde(rename = "xmlFileNameToIndenter")]
    pub indenters: &'a BTreeMap<SourceId, String>,
}

impl<'a> TableSet<'a> {
    pub fn new(db: &'a SyntaxDatabase) -> Self {
        Self {
            names: db.names(),
            mime_types: db.mime_types(),
            extensions: db.extensions(),
            first_lines: db.first_lines(),
            indenters: db.indenters(),
        }
    }
}

/// Writes `db` in `format` to `out`.
pub fn emit<W: Write>(db: &SyntaxDatabase, format: Format, out: &mut W) -> EmitResult<()> {
    let tables = TableSet::new(db);
    match format {
        Format::Qmap => write_qmap(&tables, out)?,
        Format::Json => {
            serde_json::to_writer_pretty(&mut *out, &tables)?;
            writeln!(out)?;
        }
        Format::Toml => {
            out.write_all(toml::to_string_pretty(&tables)?.as_bytes())?;
        }
    }
    Ok(())
}

/// Writes `db` to a file, creating parent directories as needed.
pub fn write_to_path(db: &SyntaxDatabase, format: Format, path: &Path) -> EmitResult<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }

    let mut buffer = Vec::new();
    emit(db, format, &mut buffer)?;
    std::fs::write(path, buffer)?;

    tracing::info!("Wrote {} database to {}", format, path.display());
    Ok(())
}
