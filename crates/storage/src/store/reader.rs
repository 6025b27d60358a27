#![forbid(unsafe_code)]

use super::{StoreError, TableStore};
use sb_core::Snapshot;
use sb_core::schema::TableSchema;
use tracing::{debug, info};

/// One snapshot read plus what was done to it at the boundary.
#[derive(Clone, Debug)]
pub struct TableRead {
    pub schema: TableSchema,
    pub snapshot: Snapshot,
    /// Store revision observed by this read.
    pub revision: i64,
    /// Expected columns the stored table lacked; they are present (empty) in
    /// `snapshot` and land in the store on the next write.
    pub healed: Vec<String>,
}

/// Reads a whole table and synthesizes any expected column it is missing.
pub fn read_table<S: TableStore + ?Sized>(
    store: &S,
    schema: TableSchema,
) -> Result<TableRead, StoreError> {
    let stored = store.read(schema.name)?;
    let mut snapshot = Snapshot::from_grid(stored.header, stored.rows);
    let healed = snapshot.heal(schema.columns);
    if !healed.is_empty() {
        info!(table = schema.name, columns = ?healed, "synthesized missing columns");
    }
    debug!(
        table = schema.name,
        rows = snapshot.len(),
        revision = stored.revision,
        "snapshot read"
    );
    Ok(TableRead {
        schema,
        snapshot,
        revision: stored.revision,
        healed,
    })
}
