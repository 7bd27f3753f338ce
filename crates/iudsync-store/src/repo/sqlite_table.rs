//! SQLite-backed `TableStore`
//!
//! Every table managed here has the same layout as `main_table` (see
//! `migrations/001_main_table.sql`). Tables other than `main_table`, such as
//! the chunked-mode staging table, are created on first write.

use std::path::Path;

use iudsync_core::errors::SyncError;
use iudsync_core::model::{ChangeRecord, IudStatus, RecordKey};
use iudsync_core::ops::{validate_table_name, TableStore};
use rusqlite::{Connection, OptionalExtension, Transaction};

use crate::db;
use crate::errors::{from_rusqlite, Result};
use crate::migrations::apply_migrations;

const COLUMNS: &str = "field1, field2, field3, field4, field5, iud";

type RawRow = (i64, String, i64, i64, i64, String);

/// `TableStore` adapter owning one SQLite connection
pub struct SqliteTableStore {
    conn: Connection,
}

impl SqliteTableStore {
    /// Open (or create) the database file, configure it and apply migrations
    ///
    /// # Errors
    ///
    /// Returns `StoreUnavailable` if the file cannot be opened or migrated.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let conn = db::open(path)?;
        Self::from_connection(conn)
    }

    /// In-memory database with migrations applied
    ///
    /// # Errors
    ///
    /// Returns `StoreUnavailable` if SQLite cannot allocate or migrate it.
    pub fn open_in_memory() -> Result<Self> {
        Self::from_connection(db::open_in_memory()?)
    }

    /// Wrap an existing connection, configuring and migrating it
    ///
    /// # Errors
    ///
    /// Returns `StoreUnavailable` if configuration or a migration fails.
    pub fn from_connection(mut conn: Connection) -> Result<Self> {
        db::configure(&conn)?;
        apply_migrations(&mut conn)?;
        Ok(Self { conn })
    }

    /// The underlying connection, for inspection in tests and tooling
    pub fn connection(&self) -> &Connection {
        &self.conn
    }

    /// Whether `table` exists in the database
    ///
    /// # Errors
    ///
    /// Returns `StoreUnavailable` if the catalog cannot be read.
    pub fn table_exists(&self, table: &str) -> Result<bool> {
        table_exists(&self.conn, table)
    }

    fn read_where(
        &self,
        op: &'static str,
        table: &str,
        sql_tail: &str,
        params: impl rusqlite::Params,
    ) -> Result<Vec<ChangeRecord>> {
        validate_table_name(table)?;
        if !table_exists(&self.conn, table).map_err(|e| e.with_op(op).with_table(table))? {
            return Ok(Vec::new());
        }

        let sql = format!("SELECT {} FROM {} {}", COLUMNS, table, sql_tail);
        let context = |e: rusqlite::Error| from_rusqlite(e).with_op(op).with_table(table);

        let mut stmt = self.conn.prepare(&sql).map_err(context)?;
        let raw = stmt
            .query_map(params, raw_row)
            .map_err(context)?
            .collect::<std::result::Result<Vec<RawRow>, _>>()
            .map_err(context)?;

        raw.into_iter().map(|r| to_change_record(op, table, r)).collect()
    }
}

fn raw_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<RawRow> {
    Ok((
        row.get(0)?,
        row.get(1)?,
        row.get(2)?,
        row.get(3)?,
        row.get(4)?,
        row.get(5)?,
    ))
}

fn keyed_raw_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<(i64, RawRow)> {
    Ok((
        row.get(0)?,
        (
            row.get(1)?,
            row.get(2)?,
            row.get(3)?,
            row.get(4)?,
            row.get(5)?,
            row.get(6)?,
        ),
    ))
}

fn to_change_record(op: &'static str, table: &str, raw: RawRow) -> Result<ChangeRecord> {
    let (field1, field2, field3, field4, field5, iud) = raw;
    let key = RecordKey::new(field1, field2);
    let status = IudStatus::from_code(&iud).map_err(|e| {
        SyncError::from(e)
            .with_op(op)
            .with_table(table)
            .with_key(&key)
    })?;
    Ok(ChangeRecord::new(key, field3, field4, field5, status))
}

fn table_exists(conn: &Connection, table: &str) -> Result<bool> {
    conn.query_row(
        "SELECT 1 FROM sqlite_master WHERE type = 'table' AND name = ?1",
        [table],
        |_| Ok(()),
    )
    .optional()
    .map(|found| found.is_some())
    .map_err(from_rusqlite)
}

fn ensure_table(tx: &Transaction<'_>, table: &str) -> rusqlite::Result<()> {
    tx.execute_batch(&format!(
        "CREATE TABLE IF NOT EXISTS {table} (
            field1 INTEGER NOT NULL,
            field2 TEXT NOT NULL,
            field3 INTEGER NOT NULL,
            field4 INTEGER NOT NULL,
            field5 INTEGER NOT NULL,
            iud TEXT NOT NULL CHECK (iud IN ('I', 'U', 'D'))
        );
        CREATE INDEX IF NOT EXISTS idx_{table}_key ON {table} (field1, field2);",
        table = table
    ))
}

fn insert_rows(tx: &Transaction<'_>, table: &str, rows: &[ChangeRecord]) -> rusqlite::Result<()> {
    let mut stmt = tx.prepare(&format!(
        "INSERT INTO {} ({}) VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
        table, COLUMNS
    ))?;
    for row in rows {
        stmt.execute(rusqlite::params![
            row.key.field1,
            row.key.field2,
            row.field3,
            row.field4,
            row.field5,
            row.status.code(),
        ])?;
    }
    Ok(())
}

impl TableStore for SqliteTableStore {
    fn read_all(&self, table: &str) -> Result<Vec<ChangeRecord>> {
        self.read_where("read_all", table, "ORDER BY rowid", [])
    }

    fn read_keys(&self, table: &str, keys: &[RecordKey]) -> Result<Vec<ChangeRecord>> {
        validate_table_name(table)?;
        if keys.is_empty() || !self.table_exists(table)? {
            return Ok(Vec::new());
        }

        let context = |e: rusqlite::Error| from_rusqlite(e).with_op("read_keys").with_table(table);
        let mut stmt = self
            .conn
            .prepare_cached(&format!(
                "SELECT rowid, {} FROM {} WHERE field1 = ?1 AND field2 = ?2",
                COLUMNS, table
            ))
            .map_err(context)?;

        // One indexed lookup per key, then back into insertion order.
        let mut found: Vec<(i64, RawRow)> = Vec::new();
        for key in keys {
            let rows = stmt
                .query_map(rusqlite::params![key.field1, key.field2], keyed_raw_row)
                .map_err(context)?;
            for row in rows {
                found.push(row.map_err(context)?);
            }
        }
        found.sort_by_key(|(rowid, _)| *rowid);
        found.dedup_by_key(|(rowid, _)| *rowid);

        found
            .into_iter()
            .map(|(_, raw)| to_change_record("read_keys", table, raw))
            .collect()
    }

    fn read_page(&self, table: &str, offset: usize, limit: usize) -> Result<Vec<ChangeRecord>> {
        self.read_where(
            "read_page",
            table,
            "ORDER BY rowid LIMIT ?1 OFFSET ?2",
            rusqlite::params![limit as i64, offset as i64],
        )
    }

    fn replace_all(&mut self, table: &str, rows: &[ChangeRecord]) -> Result<()> {
        validate_table_name(table)?;
        let context = |e: rusqlite::Error| from_rusqlite(e).with_op("replace_all").with_table(table);

        let tx = self.conn.transaction().map_err(context)?;
        ensure_table(&tx, table).map_err(context)?;
        tx.execute(&format!("DELETE FROM {}", table), [])
            .map_err(context)?;
        insert_rows(&tx, table, rows).map_err(context)?;
        tx.commit().map_err(context)?;

        tracing::debug!(table = table, rows = rows.len(), "replaced table contents");
        Ok(())
    }

    fn append_rows(&mut self, table: &str, rows: &[ChangeRecord]) -> Result<()> {
        validate_table_name(table)?;
        let context = |e: rusqlite::Error| from_rusqlite(e).with_op("append_rows").with_table(table);

        let tx = self.conn.transaction().map_err(context)?;
        ensure_table(&tx, table).map_err(context)?;
        insert_rows(&tx, table, rows).map_err(context)?;
        tx.commit().map_err(context)?;
        Ok(())
    }

    fn promote(&mut self, staging: &str, table: &str) -> Result<()> {
        validate_table_name(staging)?;
        validate_table_name(table)?;
        let context = |e: rusqlite::Error| from_rusqlite(e).with_op("promote").with_table(table);

        let tx = self.conn.transaction().map_err(context)?;
        ensure_table(&tx, staging).map_err(context)?;
        ensure_table(&tx, table).map_err(context)?;
        tx.execute_batch(&format!(
            "DELETE FROM {table};
             INSERT INTO {table} ({cols}) SELECT {cols} FROM {staging} ORDER BY rowid;
             DROP TABLE {staging};",
            table = table,
            staging = staging,
            cols = COLUMNS
        ))
        .map_err(context)?;
        tx.commit().map_err(context)?;

        tracing::debug!(staging = staging, table = table, "promoted staging table");
        Ok(())
    }

    fn drop_table(&mut self, table: &str) -> Result<()> {
        validate_table_name(table)?;
        self.conn
            .execute(&format!("DROP TABLE IF EXISTS {}", table), [])
            .map_err(|e| from_rusqlite(e).with_op("drop_table").with_table(table))?;
        Ok(())
    }
}
