#![forbid(unsafe_code)]

use super::cells::{decode_header, decode_row, encode_header, encode_row};
use super::{CommitMode, StoreError, StoredTable, TableStore, align_row, check_revision};
use rusqlite::{Connection, OptionalExtension, Transaction, TransactionBehavior, params};
use sb_core::{Cell, Row};
use std::path::Path;
use std::time::Duration;
use tracing::debug;

const DB_FILE: &str = "stratboard.db";

/// Table store backed by a SQLite file. Each table is a JSON header plus ordered
/// JSON rows; a full write replaces both inside one transaction.
#[derive(Debug)]
pub struct SqliteTableStore {
    conn: Connection,
}

impl SqliteTableStore {
    pub fn open(storage_dir: impl AsRef<Path>) -> Result<Self, StoreError> {
        let storage_dir = storage_dir.as_ref();
        std::fs::create_dir_all(storage_dir)?;

        let db_path = storage_dir.join(DB_FILE);
        let conn = Connection::open(&db_path)?;
        conn.busy_timeout(Duration::from_secs(5))?;
        install_schema(&conn)?;
        debug!(path = %db_path.display(), "table store opened");

        Ok(Self { conn })
    }
}

fn install_schema(conn: &Connection) -> Result<(), StoreError> {
    conn.execute_batch(
        r#"
        PRAGMA journal_mode=WAL;
        PRAGMA synchronous=NORMAL;

        CREATE TABLE IF NOT EXISTS sheets (
          name TEXT PRIMARY KEY,
          header_json TEXT NOT NULL,
          revision INTEGER NOT NULL
        );

        CREATE TABLE IF NOT EXISTS sheet_rows (
          sheet TEXT NOT NULL,
          ordinal INTEGER NOT NULL,
          cells_json TEXT NOT NULL,
          PRIMARY KEY (sheet, ordinal)
        );
        "#,
    )?;
    Ok(())
}

fn sheet_state(conn: &Connection, table: &str) -> Result<Option<(String, i64)>, StoreError> {
    Ok(conn
        .query_row(
            "SELECT header_json, revision FROM sheets WHERE name = ?1",
            params![table],
            |row| Ok((row.get::<_, String>(0)?, row.get::<_, i64>(1)?)),
        )
        .optional()?)
}

impl TableStore for SqliteTableStore {
    fn read(&self, table: &str) -> Result<StoredTable, StoreError> {
        let tx = self.conn.unchecked_transaction()?;
        let Some((header_json, revision)) = sheet_state(&tx, table)? else {
            return Err(StoreError::StoreUnavailable(format!(
                "table {table} not found"
            )));
        };
        let header = decode_header(&header_json)?;

        let mut stmt =
            tx.prepare("SELECT cells_json FROM sheet_rows WHERE sheet = ?1 ORDER BY ordinal")?;
        let raw_rows = stmt
            .query_map(params![table], |row| row.get::<_, String>(0))?
            .collect::<Result<Vec<_>, _>>()?;
        drop(stmt);
        tx.finish()?;

        let rows = raw_rows
            .iter()
            .map(|raw| decode_row(raw))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(StoredTable {
            header,
            rows,
            revision,
        })
    }

    fn write(
        &self,
        table: &str,
        header: &[String],
        rows: &[Vec<Cell>],
        mode: CommitMode,
    ) -> Result<i64, StoreError> {
        let tx = Transaction::new_unchecked(&self.conn, TransactionBehavior::Immediate)?;
        let current = sheet_state(&tx, table)?.map(|(_, r)| r).unwrap_or(0);
        check_revision(mode, current)?;
        let revision = current + 1;

        tx.execute(
            "INSERT INTO sheets(name, header_json, revision) VALUES (?1, ?2, ?3) \
             ON CONFLICT(name) DO UPDATE SET header_json = excluded.header_json, revision = excluded.revision",
            params![table, encode_header(header)?, revision],
        )?;
        tx.execute("DELETE FROM sheet_rows WHERE sheet = ?1", params![table])?;
        {
            let mut insert = tx.prepare(
                "INSERT INTO sheet_rows(sheet, ordinal, cells_json) VALUES (?1, ?2, ?3)",
            )?;
            for (ordinal, cells) in rows.iter().enumerate() {
                insert.execute(params![table, ordinal as i64, encode_row(cells)?])?;
            }
        }
        tx.commit()?;
        Ok(revision)
    }

    fn append_row(&self, table: &str, row: &Row) -> Result<i64, StoreError> {
        let tx = Transaction::new_unchecked(&self.conn, TransactionBehavior::Immediate)?;
        let Some((header_json, current)) = sheet_state(&tx, table)? else {
            return Err(StoreError::StoreUnavailable(format!(
                "table {table} not found"
            )));
        };
        let header = decode_header(&header_json)?;
        let next_ordinal: i64 = tx.query_row(
            "SELECT COALESCE(MAX(ordinal) + 1, 0) FROM sheet_rows WHERE sheet = ?1",
            params![table],
            |r| r.get(0),
        )?;
        let revision = current + 1;
        tx.execute(
            "INSERT INTO sheet_rows(sheet, ordinal, cells_json) VALUES (?1, ?2, ?3)",
            params![table, next_ordinal, encode_row(&align_row(&header, row))?],
        )?;
        tx.execute(
            "UPDATE sheets SET revision = ?2 WHERE name = ?1",
            params![table, revision],
        )?;
        tx.commit()?;
        Ok(revision)
    }
}
