//! Priority-resolved aggregation of syntax records.
//!
//! ## Learning: Folding an Explicit Accumulator
//!
//! Instead of mutating global tables, aggregation threads an
//! [`Accumulator`] value through a fold:
//!
//! ```text
//! records ──fold(register)──▶ Accumulator ──freeze──▶ SyntaxDatabase ──overrides──▶ final
//! ```
//!
//! Each step takes the accumulator by value and returns it, so the
//! fold step can be tested on its own.
//!
//! The conflict rule is exact: a claim replaces the current holder only
//! when its priority is strictly greater. Equal priority keeps whoever
//! registered first.

use std::collections::BTreeMap;
use std::collections::btree_map::Entry;

use crate::overrides::{Override, apply_overrides};
use crate::{SignalKind, SourceId, SyntaxDatabase, SyntaxRecord};

/// The current best claim on one signal value.
#[derive(Debug, Clone, PartialEq, Eq)]
struct Claim {
    priority: i64,
    source: SourceId,
}

/// Signal value -> best claim so far.
type ClaimTable = BTreeMap<String, Claim>;

/// Aggregation state: four priority-tracked tables plus the indenter map.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Accumulator {
    names: ClaimTable,
    mime_types: ClaimTable,
    extensions: ClaimTable,
    first_lines: ClaimTable,
    indenters: BTreeMap<SourceId, String>,
    records: usize,
}

impl Accumulator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers every claim of one record. This is the fold step.
    pub fn register(mut self, record: &SyntaxRecord) -> Self {
        let priority = record.priority();
        let source = record.source_id();

        claim(&mut self.names, SignalKind::Name, record.name(), priority, source);
        for mime_type in record.mime_types() {
            claim(&mut self.mime_types, SignalKind::MimeType, mime_type, priority, source);
        }
        for extension in record.extensions() {
            claim(&mut self.extensions, SignalKind::Extension, extension, priority, source);
        }
        for glob in record.first_line_globs() {
            claim(&mut self.first_lines, SignalKind::FirstLine, glob, priority, source);
        }

        if let Some(indenter) = record.indenter() {
            self.indenters.insert(source.clone(), indenter.to_string());
        }

        self.records += 1;
        self
    }

    /// Combines two partial accumulators.
    ///
    /// `self` must hold the records processed before `later`; on equal
    /// priority the claim from `self` is kept. The merge is associative,
    /// so chunks can be combined in any grouping as long as their order is kept.
    pub fn merge(mut self, later: Accumulator) -> Self {
        merge_table(&mut self.names, later.names);
        merge_table(&mut self.mime_types, later.mime_types);
        merge_table(&mut self.extensions, later.extensions);
        merge_table(&mut self.first_lines, later.first_lines);
        // keyed by unique source ids, so the maps never collide
        self.indenters.extend(later.indenters);
        self.records += later.records;
        self
    }

    /// Number of records registered so far.
    pub fn record_count(&self) -> usize {
        self.records
    }

    /// Drops the priority bookkeeping, leaving signal -> source tables.
    pub fn freeze(self) -> SyntaxDatabase {
        SyntaxDatabase {
            names: strip(self.names),
            mime_types: strip(self.mime_types),
            extensions: strip(self.extensions),
            first_lines: strip(self.first_lines),
            indenters: self.indenters,
        }
    }
}

fn claim(table: &mut ClaimTable, kind: SignalKind, value: &str, priority: i64, source: &SourceId) {
    match table.entry(value.to_string()) {
        Entry::Vacant(slot) => {
            slot.insert(Claim {
                priority,
                source: source.clone(),
            });
        }
        Entry::Occupied(mut slot) => {
            let current = slot.get_mut();
            if current.priority < priority {
                tracing::trace!(
                    "{kind} '{value}': {source} (priority {priority}) replaces {} (priority {})",
                    current.source,
                    current.priority
                );
                current.priority = priority;
                current.source = source.clone();
            } else {
                tracing::trace!(
                    "{kind} '{value}': keeping {} (priority {}) over {source} (priority {priority})",
                    current.source,
                    current.priority
                );
            }
        }
    }
}

fn merge_table(earlier: &mut ClaimTable, later: ClaimTable) {
    for (value, claim) in later {
        match earlier.entry(value) {
            Entry::Vacant(slot) => {
                slot.insert(claim);
            }
            Entry::Occupied(mut slot) => {
                if slot.get().priority < claim.priority {
                    slot.insert(claim);
                }
            }
        }
    }
}

fn strip(table: ClaimTable) -> BTreeMap<String, SourceId> {
    table
        .into_iter()
        .map(|(value, claim)| (value, claim.source))
        .collect()
}

/// Builds the database from a complete batch of records.
///
/// Records are folded in the order given, frozen, and then `extra`
/// overrides followed by the built-in overrides are applied.
pub fn aggregate<'a, I>(records: I, extra: &[Override]) -> SyntaxDatabase
where
    I: IntoIterator<Item = &'a SyntaxRecord>,
{
    let acc = records
        .into_iter()
        .fold(Accumulator::new(), Accumulator::register);
    finish(acc, extra)
}

/// Same result as [`aggregate`], folding contiguous chunks on worker threads.
///
/// Chunks are merged back in their original order so ties still go to the
/// record registered first.
pub fn aggregate_parallel(records: &[SyntaxRecord], extra: &[Override], jobs: usize) -> SyntaxDatabase {
    let jobs = jobs.max(1);
    let chunk_size = records.len().div_ceil(jobs).max(1);

    let partials: Vec<Accumulator> = std::thread::scope(|scope| {
        let handles: Vec<_> = records
            .chunks(chunk_size)
            .map(|chunk| {
                scope.spawn(move || chunk.iter().fold(Accumulator::new(), Accumulator::register))
            })
            .collect();

        handles
            .into_iter()
            .map(|handle| handle.join().unwrap_or_else(|panic| std::panic::resume_unwind(panic)))
            .collect()
    });

    let acc = partials
        .into_iter()
        .fold(Accumulator::new(), Accumulator::merge);
    finish(acc, extra)
}

fn finish(acc: Accumulator, extra: &[Override]) -> SyntaxDatabase {
    let records = acc.record_count();
    let mut db = acc.freeze();
    apply_overrides(&mut db, extra);

    tracing::info!(
        "Aggregated {} records: {} names, {} mime types, {} extensions, {} first-line globs, {} indenters",
        records,
        db.names().len(),
        db.mime_types().len(),
        db.extensions().len(),
        db.first_lines().len(),
        db.indenters().len()
    );
    db
}
