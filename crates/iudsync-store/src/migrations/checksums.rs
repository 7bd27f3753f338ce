//! Migration checksums
//!
//! Every applied migration records the SHA-256 of its SQL. Re-running the
//! migrations compares the embedded SQL against that record, so an edited
//! migration is caught instead of silently skipped.

use crate::errors::{checksum_mismatch, Result};
use sha2::{Digest, Sha256};

/// Hex SHA-256 of the migration SQL
pub fn compute_checksum(sql: &str) -> String {
    hex::encode(Sha256::digest(sql.as_bytes()))
}

/// Check an applied migration's recorded checksum against its current SQL
///
/// Rows recorded without a checksum are accepted.
pub fn verify_recorded(migration_id: &str, sql: &str, recorded: Option<&str>) -> Result<()> {
    let actual = compute_checksum(sql);
    match recorded {
        Some(expected) if expected != actual => {
            Err(checksum_mismatch(migration_id, expected, &actual))
        }
        _ => Ok(()),
    }
}
