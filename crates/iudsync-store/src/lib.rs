//! iudsync Store - SQLite persistence and CSV ingest
//!
//! Provides:
//! - SQLite connection management and embedded migrations
//! - `SqliteTableStore`, the on-disk `TableStore` adapter
//! - `CsvSource`, the whole-file and chunked loader for incoming snapshots

pub mod db;
pub mod errors;
pub mod ingest;
pub mod migrations;
pub mod repo;

// Re-export key types
pub use errors::Result;
pub use ingest::{ChunkIter, CsvSource};
pub use repo::SqliteTableStore;
