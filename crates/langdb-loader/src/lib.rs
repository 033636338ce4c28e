//! # Langdb Loader
//!
//! Turns definition sources into [`langdb_core::SyntaxRecord`]s.
//!
//! ```text
//! manifest.toml ──read──▶ AttributeMap ──load_record──▶ SyntaxRecord
//!                                                          │
//!                        DialectDeriver (html -> html-php) ┘──▶ BatchReport
//! ```
//!
//! Failures are per source: a source that cannot be read or has a
//! malformed attribute is dropped with a diagnostic, and the rest of
//! the batch still loads.

mod attributes;
mod batch;
mod diagnostic;
mod dialect;
mod loader;
mod manifest;

pub use attributes::{AttributeMap, AttributeSource, LIST_SEPARATOR, split_list};
pub use batch::{BatchReport, default_jobs, load_path, load_paths, load_paths_parallel, load_sources};
pub use diagnostic::{Diagnostic, Severity};
pub use dialect::{DialectDeriver, DialectRule, php_rules};
pub use loader::{Loaded, LoaderOptions, MISSING_NAME, load_record, parse_bool, parse_priority};
pub use manifest::{RESOURCE, parse_manifest, read_manifest, scan_directory};

/// Attribute keys understood by the loader.
pub mod keys {
    pub use crate::attributes::{EXTENSIONS, FIRST_LINE_GLOBS, HIDDEN, INDENTER, MIME_TYPE, NAME, PRIORITY};
}

use std::path::PathBuf;

/// Result type for loading operations
pub type LoadResult<T> = Result<T, LoadError>;

/// Errors that can occur while loading one definition source
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    #[error("Cannot read {path}: {source}")]
    SourceUnavailable {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Cannot parse {path}: {source}")]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },

    #[error("Malformed attribute '{field}' value '{value}': {reason}")]
    MalformedField {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Invalid bool attribute value '{value}' for '{field}'")]
    InvalidConfiguration { field: String, value: String },

    #[error("Required attribute '{field}' is not set")]
    MissingRequiredField { field: String },

    #[error("Invalid record: {0}")]
    Record(#[from] langdb_core::RecordError),
}

impl LoadError {
    /// True for errors caused by an attribute that is present but unusable.
    pub fn is_malformed(&self) -> bool {
        matches!(
            self,
            LoadError::MalformedField { .. } | LoadError::InvalidConfiguration { .. }
        )
    }
}
