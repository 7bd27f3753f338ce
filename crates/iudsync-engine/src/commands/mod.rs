//! Command orchestration layer.
//!
//! Provides high-level command functions that coordinate between
//! core domain logic and persistence layer.

pub mod engine_command;
pub mod query;
pub mod upload;

use iudsync_store::errors::Result;
use iudsync_store::SqliteTableStore;

use crate::config::SyncConfig;

/// Validate `config` and open its SQLite store, applying migrations
///
/// # Errors
///
/// `InvalidInput` for a bad config, `StoreUnavailable` if the database
/// cannot be opened or migrated.
pub fn open_store(config: &SyncConfig) -> Result<SqliteTableStore> {
    config.validate()?;
    SqliteTableStore::open(&config.db_path)
}
