#![forbid(unsafe_code)]

use super::{StoreError, TableStore};
use sb_core::Snapshot;
use tracing::{info, warn};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum CommitMode {
    /// Last writer wins. Changes committed by other sessions since our read are lost.
    #[default]
    Overwrite,
    /// Fails with `RevisionMismatch` unless the table is still at this revision.
    IfUnchanged(i64),
}

/// Writes the whole snapshot back in exactly one store call. Cells are
/// normalized to store-safe scalars first.
///
/// A failed call leaves the store as the store leaves it: the SQLite store rolls
/// back, a remote sheet may be left partially written.
pub fn commit<S: TableStore + ?Sized>(
    store: &S,
    table: &str,
    snapshot: &Snapshot,
    mode: CommitMode,
) -> Result<i64, StoreError> {
    let rows = snapshot.to_grid();
    match store.write(table, snapshot.header(), &rows, mode) {
        Ok(revision) => {
            info!(table, rows = rows.len(), revision, "table committed");
            Ok(revision)
        }
        Err(err) => {
            warn!(table, error = %err, "table commit failed");
            Err(err)
        }
    }
}
