//! # Langdb Core
//!
//! Builds the static tables an editor consults to pick a syntax definition.
//!
//! ## Architecture Overview
//!
//! ```text
//! ┌──────────────┐   ┌──────────────────────────┐   ┌────────────────┐
//! │ SyntaxRecord │──▶│ Accumulator (fold)       │──▶│ SyntaxDatabase │
//! │ SyntaxRecord │──▶│  name / mime / ext / 1st │   │  + overrides   │
//! │     ...      │──▶│  (priority, source)      │   └────────────────┘
//! └──────────────┘   └──────────────────────────┘
//! ```
//!
//! Every signal value ends up with exactly one source: the highest
//! priority claimant, or the first one registered on a tie.
//!
//! ## Learning: Module Organization
//!
//! Modules are private where possible and re-exported with `pub use`,
//! so callers write `langdb_core::aggregate` rather than reaching into
//! `langdb_core::aggregate::aggregate`.

mod aggregate;
mod database;
mod overrides;
mod record;

pub use aggregate::{Accumulator, aggregate, aggregate_parallel};
pub use database::{SignalKind, SignalTable, SyntaxDatabase};
pub use overrides::{Override, PHP_FIRST_LINE, PHP_SOURCE, apply_overrides, builtin_overrides};
pub use record::{SourceId, SyntaxRecord, SyntaxRecordBuilder, fix_extension};

/// Result type for record construction
pub type RecordResult<T> = Result<T, RecordError>;

/// Errors that can occur while constructing records
#[derive(Debug, thiserror::Error)]
pub enum RecordError {
    #[error("Source identifier must not be empty")]
    EmptySourceId,

    #[error("Record from {0} has an empty name")]
    EmptyName(SourceId),
}
