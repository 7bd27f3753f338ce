//! Error handling for iudsync-store
//!
//! Wraps iudsync-core SyncError with helpers for rusqlite, csv and io errors

use iudsync_core::errors::{SyncError, SyncErrorKind};
use std::path::Path;

/// Result type alias using SyncError
pub type Result<T> = std::result::Result<T, SyncError>;

/// Create a migration error
pub fn migration_error(migration_id: &str, reason: &str) -> SyncError {
    SyncError::new(SyncErrorKind::StoreUnavailable)
        .with_op("migration")
        .with_message(format!("Migration {} failed: {}", migration_id, reason))
}

/// Create a checksum mismatch error for an already-applied migration
pub fn checksum_mismatch(migration_id: &str, expected: &str, actual: &str) -> SyncError {
    SyncError::new(SyncErrorKind::StoreUnavailable)
        .with_op("migration_checksum")
        .with_message(format!(
            "Checksum mismatch for migration {}: expected {}, got {}",
            migration_id, expected, actual
        ))
}

/// Create a database error from rusqlite::Error
pub fn from_rusqlite(err: rusqlite::Error) -> SyncError {
    SyncError::new(SyncErrorKind::StoreUnavailable)
        .with_op("sqlite")
        .with_message(err.to_string())
}

/// Create an IO error
pub fn io_error(operation: &str, path: &Path, err: std::io::Error) -> SyncError {
    SyncError::new(SyncErrorKind::Io)
        .with_op(operation.to_string())
        .with_file_path(path.display().to_string())
        .with_message(err.to_string())
}

/// Map a csv::Error, keeping the line it happened on
///
/// I/O failures go through [`io_error`]; everything else (bad UTF-8, ragged
/// rows) is `MalformedInput`.
pub fn csv_error(operation: &str, path: &Path, err: csv::Error) -> SyncError {
    let line = err.position().map(|p| p.line());
    let message = err.to_string();
    let mapped = match err.into_kind() {
        csv::ErrorKind::Io(io) => io_error(operation, path, io),
        _ => SyncError::new(SyncErrorKind::MalformedInput)
            .with_op(operation.to_string())
            .with_file_path(path.display().to_string())
            .with_message(message),
    };
    match line {
        Some(line) => mapped.with_line(line),
        None => mapped,
    }
}
