//! Per-source diagnostics collected while loading a batch.

use std::fmt;

/// How serious a diagnostic is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Severity {
    /// The source contributed, but something was substituted or skipped.
    Warning,
    /// The source was rejected.
    Error,
}

/// A message about one definition source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    /// Source id, or the path when the id is not known yet.
    pub origin: String,
    pub severity: Severity,
    pub message: String,
}

impl Diagnostic {
    pub fn warning(origin: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            origin: origin.into(),
            severity: Severity::Warning,
            message: message.into(),
        }
    }

    pub fn error(origin: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            origin: origin.into(),
            severity: Severity::Error,
            message: message.into(),
        }
    }

    /// Forwards the diagnostic to the tracing subscriber.
    pub fn log(&self) {
        match self.severity {
            Severity::Warning => tracing::warn!("{}: {}", self.origin, self.message),
            Severity::Error => tracing::error!("{}: {}", self.origin, self.message),
        }
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let level = match self.severity {
            Severity::Warning => "warning",
            Severity::Error => "error",
        };
        write!(f, "{level}: {}: {}", self.origin, self.message)
    }
}
