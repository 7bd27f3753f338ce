//! Database connection management
//!
//! Provides utilities for opening and managing SQLite connections

use crate::errors::{from_rusqlite, Result};
use rusqlite::Connection;
use std::path::Path;

/// Open a SQLite database at the given path
///
/// # Errors
///
/// Returns `StoreUnavailable` if the file cannot be opened or created.
pub fn open<P: AsRef<Path>>(path: P) -> Result<Connection> {
    let path = path.as_ref();
    Connection::open(path).map_err(|e| {
        from_rusqlite(e)
            .with_op("db_open")
            .with_file_path(path.display().to_string())
    })
}

/// Open an in-memory SQLite database (for testing)
///
/// # Errors
///
/// Returns `StoreUnavailable` if SQLite cannot allocate the database.
pub fn open_in_memory() -> Result<Connection> {
    Connection::open_in_memory().map_err(from_rusqlite)
}

/// Configure a connection for a single-writer run
///
/// # Errors
///
/// Returns `StoreUnavailable` if a pragma is rejected.
pub fn configure(conn: &Connection) -> Result<()> {
    // journal_mode answers with the mode actually set ("memory" for in-memory dbs)
    let _mode: String = conn
        .query_row("PRAGMA journal_mode = WAL", [], |row| row.get(0))
        .map_err(from_rusqlite)?;

    conn.busy_timeout(std::time::Duration::from_secs(5))
        .map_err(from_rusqlite)?;

    Ok(())
}
