//! Loading a complete batch of definition sources.
//!
//! ## Learning: Failure Isolation
//!
//! Each source is loaded independently and its `Result` is kept apart
//! from the others. A bad source becomes a diagnostic and the batch
//! keeps going; nothing here aborts the whole run.
//!
//! The parallel variant uses scoped threads and a channel. Results are
//! put back into input order before they are accepted, so both variants
//! produce the same report.

use langdb_core::{SourceId, SyntaxRecord};
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use std::sync::mpsc;

use crate::manifest::read_manifest;
use crate::{AttributeSource, DialectDeriver, Diagnostic, LoadResult, Loaded, LoaderOptions, Severity, load_record};

/// Records and diagnostics from one batch.
#[derive(Debug, Default)]
pub struct BatchReport {
    records: Vec<SyntaxRecord>,
    diagnostics: Vec<Diagnostic>,
    seen: BTreeSet<SourceId>,
}

impl BatchReport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Accepted records, in processing order.
    pub fn records(&self) -> &[SyntaxRecord] {
        &self.records
    }

    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    /// Number of sources that were rejected.
    pub fn rejected(&self) -> usize {
        self.diagnostics
            .iter()
            .filter(|d| d.severity == Severity::Error)
            .count()
    }

    pub fn into_parts(self) -> (Vec<SyntaxRecord>, Vec<Diagnostic>) {
        (self.records, self.diagnostics)
    }

    /// Records the outcome of loading one source.
    pub fn accept(&mut self, origin: &str, outcome: LoadResult<Loaded>) {
        match outcome {
            Ok(loaded) => {
                for diagnostic in loaded.diagnostics {
                    self.push_diagnostic(diagnostic);
                }
                self.push_record(loaded.record, Severity::Error);
            }
            Err(err) => self.push_diagnostic(Diagnostic::error(origin, err.to_string())),
        }
    }

    /// Appends records produced by a dialect deriver from the records loaded so far.
    ///
    /// A derived record whose id is already taken (for example by a generated
    /// file that was loaded from disk) is skipped with a warning.
    pub fn derive(&mut self, deriver: &dyn DialectDeriver) {
        let mut diagnostics = Vec::new();
        let derived = deriver.derive(&self.records, &mut diagnostics);

        for diagnostic in diagnostics {
            self.push_diagnostic(diagnostic);
        }
        for record in derived {
            self.push_record(record, Severity::Warning);
        }
    }

    fn push_record(&mut self, record: SyntaxRecord, on_duplicate: Severity) {
        if self.seen.insert(record.source_id().clone()) {
            self.records.push(record);
            return;
        }

        let message = format!("Duplicate source id {}, definition ignored", record.source_id());
        let diagnostic = match on_duplicate {
            Severity::Warning => Diagnostic::warning(record.source_id().as_str(), message),
            Severity::Error => Diagnostic::error(record.source_id().as_str(), message),
        };
        self.push_diagnostic(diagnostic);
    }

    fn push_diagnostic(&mut self, diagnostic: Diagnostic) {
        diagnostic.log();
        self.diagnostics.push(diagnostic);
    }

    fn summarize(&self) {
        tracing::info!(
            "Loaded {} definitions ({} rejected, {} diagnostics)",
            self.records.len(),
            self.rejected(),
            self.diagnostics.len()
        );
    }
}

/// Loads in-memory attribute sources.
pub fn load_sources<S: AttributeSource>(sources: &[S], options: LoaderOptions) -> BatchReport {
    let mut report = BatchReport::new();
    for source in sources {
        report.accept(source.source_id().as_str(), load_record(source, options));
    }
    report.summarize();
    report
}

/// Reads and loads one manifest file.
pub fn load_path(path: &Path, options: LoaderOptions) -> LoadResult<Loaded> {
    let attributes = read_manifest(path)?;
    load_record(&attributes, options)
}

/// Loads manifest files one after another.
pub fn load_paths(paths: &[PathBuf], options: LoaderOptions) -> BatchReport {
    let mut report = BatchReport::new();
    for path in paths {
        report.accept(&path.display().to_string(), load_path(path, options));
    }
    report.summarize();
    report
}

/// Loads manifest files on up to `jobs` threads.
///
/// The report is identical to [`load_paths`] on the same input.
pub fn load_paths_parallel(paths: &[PathBuf], options: LoaderOptions, jobs: usize) -> BatchReport {
    let jobs = jobs.max(1);
    let chunk_size = paths.len().div_ceil(jobs).max(1);
    let (tx, rx) = mpsc::channel();

    std::thread::scope(|scope| {
        for (chunk_index, chunk) in paths.chunks(chunk_size).enumerate() {
            let tx = tx.clone();
            scope.spawn(move || {
                for (offset, path) in chunk.iter().enumerate() {
                    let result = load_path(path, options);
                    let _ = tx.send((chunk_index * chunk_size + offset, result));
                }
            });
        }
    });
    drop(tx);

    let mut results: Vec<(usize, LoadResult<Loaded>)> = rx.into_iter().collect();
    results.sort_by_key(|(index, _)| *index);

    let mut report = BatchReport::new();
    for (index, result) in results {
        report.accept(&paths[index].display().to_string(), result);
    }
    report.summarize();
    report
}

/// Jobs to use for parallel loading.
pub fn default_jobs() -> usize {
    std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(4)
        .min(8)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{AttributeMap, php_rules};
    use tempfile::tempdir;

    fn source(id: &str) -> AttributeMap {
        AttributeMap::new(SourceId::new(id).unwrap())
    }

    #[test]
    fn test_bad_source_does_not_block_batch() {
        let sources = vec![
            source("a.xml").with("name", "A"),
            source("bad.xml").with("name", "Bad").with("hidden", "maybe"),
            source("c.xml").with("name", "C").with("priority", "x"),
            source("d.xml"),
        ];

        let report = load_sources(&sources, LoaderOptions::default());
        let ids: Vec<_> = report.records().iter().map(|r| r.source_id().as_str()).collect();

        assert_eq!(ids, vec!["a.xml", "d.xml"]);
        assert_eq!(report.rejected(), 2);
        // d.xml contributes under the sentinel name, with a warning
        assert_eq!(report.diagnostics().len(), 3);
    }

    #[test]
    fn test_duplicate_source_id_rejected() {
        let sources = vec![source("a.xml").with("name", "A"), source("a.xml").with("name", "A2")];
        let report = load_sources(&sources, LoaderOptions::default());
        assert_eq!(report.records().len(), 1);
        assert_eq!(report.records()[0].name(), "A");
        assert_eq!(report.rejected(), 1);
    }

    #[test]
    fn test_derive_appends_after_primaries() {
        let sources = vec![
            source("html.xml").with("name", "HTML").with("extensions", "*.html"),
            source("css.xml").with("name", "CSS"),
        ];
        let mut report = load_sources(&sources, LoaderOptions::default());
        report.derive(&php_rules());

        let ids: Vec<_> = report.records().iter().map(|r| r.source_id().as_str()).collect();
        assert_eq!(ids, vec!["html.xml", "css.xml", "css-php.xml", "html-php.xml"]);
        // javascript host missing
        assert_eq!(report.diagnostics().len(), 1);
        assert_eq!(report.rejected(), 0);
    }

    #[test]
    fn test_derived_id_already_on_disk_is_skipped() {
        let sources = vec![
            source("html.xml").with("name", "HTML"),
            source("html-php.xml").with("name", "PHP/PHP"),
        ];
        let mut report = load_sources(&sources, LoaderOptions::default());
        report.derive(&php_rules());

        let php: Vec<_> = report
            .records()
            .iter()
            .filter(|r| r.source_id().as_str() == "html-php.xml")
            .collect();
        assert_eq!(php.len(), 1);
        assert_eq!(report.rejected(), 0);
    }

    #[test]
    fn test_parallel_matches_sequential() {
        let dir = tempdir().unwrap();
        let mut paths = Vec::new();
        for i in 0..17 {
            let path = dir.path().join(format!("lang{i:02}.toml"));
            let body = if i == 5 {
                "name = \"Broken\"\nhidden = \"perhaps\"\n".to_string()
            } else {
                format!("name = \"Lang {i}\"\nextensions = \"*.l{i}\"\npriority = {}\n", i % 3)
            };
            std::fs::write(&path, body).unwrap();
            paths.push(path);
        }
        paths.push(dir.path().join("missing.toml"));

        let sequential = load_paths(&paths, LoaderOptions::default());
        for jobs in [1, 2, 4, 32] {
            let parallel = load_paths_parallel(&paths, LoaderOptions::default(), jobs);
            assert_eq!(parallel.records(), sequential.records());
            assert_eq!(parallel.diagnostics(), sequential.diagnostics());
        }
        assert_eq!(sequential.records().len(), 16);
        assert_eq!(sequential.rejected(), 2);
    }

    #[test]
    fn test_parallel_empty() {
        let report = load_paths_parallel(&[], LoaderOptions::default(), 4);
        assert!(report.records().is_empty());
    }
}
