#![forbid(unsafe_code)]

use super::{CommitMode, StoreError, StoredTable, TableStore, align_row, check_revision};
use sb_core::{Cell, Row};
use std::collections::BTreeMap;
use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

/// Process-local table store. Shared between sessions by reference; every call
/// is atomic with respect to the others, but nothing spans calls.
#[derive(Debug, Default)]
pub struct MemoryTableStore {
    tables: Mutex<BTreeMap<String, StoredTable>>,
    fail_reads: AtomicBool,
    fail_writes: AtomicBool,
    writes: AtomicUsize,
    appends: AtomicUsize,
}

impl MemoryTableStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seeds a table directly, bypassing revision checks and write counters.
    pub fn insert_table(&self, table: &str, header: &[&str], rows: Vec<Vec<Cell>>) {
        if let Ok(mut tables) = self.tables.lock() {
            tables.insert(
                table.to_string(),
                StoredTable {
                    header: header.iter().map(|c| c.to_string()).collect(),
                    rows,
                    revision: 0,
                },
            );
        }
    }

    pub fn set_fail_reads(&self, fail: bool) {
        self.fail_reads.store(fail, Ordering::SeqCst);
    }

    pub fn set_fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    /// Number of successful full-table writes since creation.
    pub fn write_count(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }

    pub fn append_count(&self) -> usize {
        self.appends.load(Ordering::SeqCst)
    }

    fn lock(
        &self,
    ) -> Result<std::sync::MutexGuard<'_, BTreeMap<String, StoredTable>>, StoreError> {
        self.tables
            .lock()
            .map_err(|_| StoreError::StoreUnavailable("memory store lock poisoned".to_string()))
    }
}

impl TableStore for MemoryTableStore {
    fn read(&self, table: &str) -> Result<StoredTable, StoreError> {
        if self.fail_reads.load(Ordering::SeqCst) {
            return Err(StoreError::StoreUnavailable(format!(
                "table {table} unreachable"
            )));
        }
        self.lock()?
            .get(table)
            .cloned()
            .ok_or_else(|| StoreError::StoreUnavailable(format!("table {table} not found")))
    }

    fn write(
        &self,
        table: &str,
        header: &[String],
        rows: &[Vec<Cell>],
        mode: CommitMode,
    ) -> Result<i64, StoreError> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(StoreError::StoreUnavailable(format!(
                "table {table} unreachable"
            )));
        }
        let mut tables = self.lock()?;
        let current = tables.get(table).map(|t| t.revision).unwrap_or(0);
        check_revision(mode, current)?;
        let revision = current + 1;
        tables.insert(
            table.to_string(),
            StoredTable {
                header: header.to_vec(),
                rows: rows.to_vec(),
                revision,
            },
        );
        self.writes.fetch_add(1, Ordering::SeqCst);
        Ok(revision)
    }

    fn append_row(&self, table: &str, row: &Row) -> Result<i64, StoreError> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(StoreError::StoreUnavailable(format!(
                "table {table} unreachable"
            )));
        }
        let mut tables = self.lock()?;
        let Some(stored) = tables.get_mut(table) else {
            return Err(StoreError::StoreUnavailable(format!(
                "table {table} not found"
            )));
        };
        let cells = align_row(&stored.header, row);
        stored.rows.push(cells);
        stored.revision += 1;
        self.appends.fetch_add(1, Ordering::SeqCst);
        Ok(stored.revision)
    }
}
