#![forbid(unsafe_code)]

//! One handler per user action. Every handler runs a single
//! read → locate → mutate → commit cycle from a fresh snapshot and issues at
//! most one store write; any failure aborts the action before that write.

mod activities;
mod kpis;
mod login;

use super::{
    CommitMode, CommitOutcome, IgnoredField, StoreError, TableRead, TableStore, commit,
};
use sb_core::{Cell, Row};
use sb_core::locate::{LocateError, NaturalKey, locate};
use sb_core::parse::{format_date, parse_date};
use tracing::warn;

pub struct Engine<S> {
    store: S,
    guarded_writes: bool,
}

impl<S: TableStore> Engine<S> {
    pub fn new(store: S) -> Self {
        Self {
            store,
            guarded_writes: false,
        }
    }

    /// Commit only if the table is unchanged since this action's read. Off by
    /// default: the baseline is last-writer-wins.
    pub fn with_guarded_writes(mut self, enabled: bool) -> Self {
        self.guarded_writes = enabled;
        self
    }

    pub fn guarded_writes(&self) -> bool {
        self.guarded_writes
    }

    fn commit_changes(
        &self,
        read: &TableRead,
        changed_rows: usize,
    ) -> Result<CommitOutcome, StoreError> {
        if changed_rows == 0 {
            return Ok(CommitOutcome {
                revision: read.revision,
                committed: false,
                changed_rows,
            });
        }
        let mode = if self.guarded_writes {
            CommitMode::IfUnchanged(read.revision)
        } else {
            CommitMode::Overwrite
        };
        let revision = commit(&self.store, read.schema.name, &read.snapshot, mode)?;
        Ok(CommitOutcome {
            revision,
            committed: true,
            changed_rows,
        })
    }
}

fn locate_row(read: &TableRead, key: &NaturalKey) -> Result<usize, StoreError> {
    match locate(&read.snapshot, &read.schema, key) {
        Ok(found) => {
            if found.duplicates > 0 {
                warn!(
                    table = read.schema.name,
                    key = %key,
                    duplicates = found.duplicates,
                    "duplicate natural key; using first match"
                );
            }
            Ok(found.index)
        }
        Err(LocateError::NotFound) => Err(StoreError::RecordNotFound {
            table: read.schema.name,
            key: key.to_string(),
        }),
        Err(err @ LocateError::KeyArity { .. }) => Err(StoreError::InvalidInput(err.message())),
    }
}

/// Empty stays empty; a date is rewritten as `YYYY-MM-DD`. Anything else is
/// recorded in `ignored` and yields `None`.
fn normalize_date(
    column: &'static str,
    raw: &str,
    ignored: &mut Vec<IgnoredField>,
) -> Option<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Some(String::new());
    }
    let normalized = parse_date(trimmed).map(format_date);
    if normalized.is_none() {
        warn!(column, value = trimmed, "unparsable date left unchanged");
        ignored.push(IgnoredField {
            column,
            value: raw.to_string(),
        });
    }
    normalized
}

/// Whole numbers are stored as integers so the sheet does not grow `.0` suffixes.
/// Non-finite values are recorded in `ignored` and yield `None`.
fn number_cell(
    column: &'static str,
    value: f64,
    ignored: &mut Vec<IgnoredField>,
) -> Option<Cell> {
    if !value.is_finite() {
        warn!(column, value, "non-finite number left unchanged");
        ignored.push(IgnoredField {
            column,
            value: value.to_string(),
        });
        return None;
    }
    if value.fract() == 0.0 && value.abs() < 9.0e15 {
        Some(Cell::Int(value as i64))
    } else {
        Some(Cell::Float(value))
    }
}

/// Cell-wise comparison that treats an absent column and an empty cell alike.
fn rows_equal(a: &Row, b: &Row) -> bool {
    a.columns()
        .chain(b.columns())
        .all(|column| a.get(column).normalized() == b.get(column).normalized())
}
