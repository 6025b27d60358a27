#![forbid(unsafe_code)]

mod actions;
mod cells;
mod error;
mod memory;
mod reader;
mod requests;
mod sqlite;
mod writer;

pub use actions::Engine;
pub use error::StoreError;
pub use memory::MemoryTableStore;
pub use reader::{TableRead, read_table};
pub use requests::*;
pub use sqlite::SqliteTableStore;
pub use writer::{CommitMode, commit};

use sb_core::{Cell, Row};
use std::sync::Arc;

/// Raw contents of one table as held by a store.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct StoredTable {
    pub header: Vec<String>,
    pub rows: Vec<Vec<Cell>>,
    /// Bumped by every successful `write` and `append_row`.
    pub revision: i64,
}

/// The only interface to the backing store.
///
/// There is no row-level update: callers read a whole table, change it in memory,
/// and overwrite it with `write`. `append_row` is the single row-granular operation.
pub trait TableStore {
    fn read(&self, table: &str) -> Result<StoredTable, StoreError>;

    /// Replaces header and every row. Returns the new revision.
    fn write(
        &self,
        table: &str,
        header: &[String],
        rows: &[Vec<Cell>],
        mode: CommitMode,
    ) -> Result<i64, StoreError>;

    /// Adds one row after the last, aligned to the stored header. Returns the new revision.
    fn append_row(&self, table: &str, row: &Row) -> Result<i64, StoreError>;
}

impl<T: TableStore + ?Sized> TableStore for &T {
    fn read(&self, table: &str) -> Result<StoredTable, StoreError> {
        (**self).read(table)
    }

    fn write(
        &self,
        table: &str,
        header: &[String],
        rows: &[Vec<Cell>],
        mode: CommitMode,
    ) -> Result<i64, StoreError> {
        (**self).write(table, header, rows, mode)
    }

    fn append_row(&self, table: &str, row: &Row) -> Result<i64, StoreError> {
        (**self).append_row(table, row)
    }
}

impl<T: TableStore + ?Sized> TableStore for Arc<T> {
    fn read(&self, table: &str) -> Result<StoredTable, StoreError> {
        (**self).read(table)
    }

    fn write(
        &self,
        table: &str,
        header: &[String],
        rows: &[Vec<Cell>],
        mode: CommitMode,
    ) -> Result<i64, StoreError> {
        (**self).write(table, header, rows, mode)
    }

    fn append_row(&self, table: &str, row: &Row) -> Result<i64, StoreError> {
        (**self).append_row(table, row)
    }
}

fn check_revision(mode: CommitMode, actual: i64) -> Result<(), StoreError> {
    match mode {
        CommitMode::IfUnchanged(expected) if expected != actual => {
            Err(StoreError::RevisionMismatch { expected, actual })
        }
        _ => Ok(()),
    }
}

fn align_row(header: &[String], row: &Row) -> Vec<Cell> {
    header
        .iter()
        .map(|column| row.get(column).normalized())
        .collect()
}
