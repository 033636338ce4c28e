//! The record loader: typed extraction from an attribute source.
//!
//! All optional attributes are read exactly once here; the aggregator
//! only ever sees fully typed [`SyntaxRecord`]s.

use langdb_core::SyntaxRecord;

use crate::attributes::{self, AttributeSource, split_list};
use crate::{Diagnostic, LoadError, LoadResult};

/// Name substituted when a source does not set one.
pub const MISSING_NAME: &str = "Error: .parser name is not set!!!";

/// Loader behavior switches.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LoaderOptions {
    /// Reject sources without a name instead of substituting [`MISSING_NAME`].
    pub strict_names: bool,
}

/// A successfully loaded record plus any non-fatal diagnostics.
#[derive(Debug, Clone)]
pub struct Loaded {
    pub record: SyntaxRecord,
    pub diagnostics: Vec<Diagnostic>,
}

/// Parses a boolean attribute. Accepts `true`/`1` and `false`/`0`, case-insensitively.
pub fn parse_bool(field: &str, value: &str) -> LoadResult<bool> {
    match value.to_lowercase().as_str() {
        "true" | "1" => Ok(true),
        "false" | "0" => Ok(false),
        _ => Err(LoadError::InvalidConfiguration {
            field: field.to_string(),
            value: value.to_string(),
        }),
    }
}

/// Parses the priority attribute.
pub fn parse_priority(value: &str) -> LoadResult<i64> {
    value
        .trim()
        .parse::<i64>()
        .map_err(|err| LoadError::MalformedField {
            field: attributes::PRIORITY.to_string(),
            value: value.to_string(),
            reason: err.to_string(),
        })
}

/// Turns one definition source into a [`SyntaxRecord`].
///
/// A malformed `priority` or `hidden` fails the source. A missing or empty
/// `name` is substituted with [`MISSING_NAME`] and reported as a warning,
/// unless [`LoaderOptions::strict_names`] is set.
pub fn load_record<S>(source: &S, options: LoaderOptions) -> LoadResult<Loaded>
where
    S: AttributeSource + ?Sized,
{
    let source_id = source.source_id().clone();
    let mut diagnostics = Vec::new();

    let priority = source
        .attribute(attributes::PRIORITY)
        .map(parse_priority)
        .transpose()?
        .unwrap_or(0);

    let hidden = source
        .attribute(attributes::HIDDEN)
        .map(|value| parse_bool(attributes::HIDDEN, value))
        .transpose()?
        .unwrap_or(false);

    let name = match source.attribute(attributes::NAME) {
        Some(name) if !name.is_empty() => name.to_string(),
        _ if options.strict_names => {
            return Err(LoadError::MissingRequiredField {
                field: attributes::NAME.to_string(),
            });
        }
        _ => {
            diagnostics.push(Diagnostic::warning(
                source_id.as_str(),
                format!("Required attribute '{}' is not set", attributes::NAME),
            ));
            MISSING_NAME.to_string()
        }
    };

    let list = |key: &str| source.attribute(key).map(split_list).unwrap_or_default();

    let record = SyntaxRecord::builder(source_id, name)
        .extensions(list(attributes::EXTENSIONS))
        .first_line_globs(list(attributes::FIRST_LINE_GLOBS))
        .mime_types(list(attributes::MIME_TYPE))
        .priority(priority)
        .hidden(hidden)
        .indenter(source.attribute(attributes::INDENTER).map(str::to_string))
        .build()?;

    Ok(Loaded {
        record,
        diagnostics,
    })
}
