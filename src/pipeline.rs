//! The build pipeline: scan, load, derive, aggregate, emit.

use anyhow::Context;
use langdb_core::{SyntaxDatabase, aggregate, aggregate_parallel};
use langdb_loader::{BatchReport, default_jobs, load_paths, load_paths_parallel, scan_directory};

use crate::config::BuildConfig;

/// What a build produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Summary {
    pub records: usize,
    pub rejected: usize,
    pub warnings: usize,
    pub entries: usize,
}

/// Loads every definition and resolves the database, without writing it.
pub fn build(config: &BuildConfig) -> anyhow::Result<(SyntaxDatabase, BatchReport)> {
    let paths = scan_directory(&config.definitions_dir, &config.manifest_extension)
        .with_context(|| format!("Failed to scan {}", config.definitions_dir.display()))?;

    let options = config.loader_options();
    let mut report = if config.parallel {
        load_paths_parallel(&paths, options, default_jobs())
    } else {
        load_paths(&paths, options)
    };

    report.derive(&config.dialects);

    let db = if config.parallel {
        aggregate_parallel(report.records(), &config.overrides, default_jobs())
    } else {
        aggregate(report.records(), &config.overrides)
    };

    Ok((db, report))
}

/// Builds the database and writes it to the configured output file.
pub fn run(config: &BuildConfig) -> anyhow::Result<Summary> {
    let (db, report) = build(config)?;

    langdb_emit::write_to_path(&db, config.format, &config.out_file)
        .with_context(|| format!("Failed to write {}", config.out_file.display()))?;

    let rejected = report.rejected();
    Ok(Summary {
        records: report.records().len(),
        rejected,
        warnings: report.diagnostics().len() - rejected,
        entries: db.len(),
    })
}
