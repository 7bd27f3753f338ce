//! Run configuration

use std::path::PathBuf;

use iudsync_core::errors::{SyncError, SyncErrorKind};
use iudsync_core::ops::validate_table_name;

pub const DEFAULT_DB_PATH: &str = "sample_reporting.db";
pub const DEFAULT_TABLE: &str = "main_table";
pub const DEFAULT_CHUNK_SIZE: usize = 1000;

/// Settings for one upload or query run
///
/// Built from CLI arguments and checked with [`SyncConfig::validate`]
/// before any store access.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyncConfig {
    pub db_path: PathBuf,
    pub table_name: String,
    /// Rows per chunk in chunked mode, and per page of the final pass
    pub chunk_size: usize,
    /// Tag stored rows missing from the input as Deletes in chunked mode;
    /// when off they are carried over unchanged
    pub detect_deletes: bool,
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            db_path: PathBuf::from(DEFAULT_DB_PATH),
            table_name: DEFAULT_TABLE.to_string(),
            chunk_size: DEFAULT_CHUNK_SIZE,
            detect_deletes: true,
        }
    }
}

impl SyncConfig {
    pub fn with_db_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.db_path = path.into();
        self
    }

    pub fn with_table(mut self, table: impl Into<String>) -> Self {
        self.table_name = table.into();
        self
    }

    pub fn with_chunk_size(mut self, chunk_size: usize) -> Self {
        self.chunk_size = chunk_size;
        self
    }

    pub fn with_detect_deletes(mut self, detect_deletes: bool) -> Self {
        self.detect_deletes = detect_deletes;
        self
    }

    /// Name of the chunked-mode staging table
    pub fn staging_table(&self) -> String {
        format!("{}_staging", self.table_name)
    }

    /// # Errors
    ///
    /// Returns `InvalidInput` for a table name that is not a plain SQL
    /// identifier or a zero chunk size.
    pub fn validate(&self) -> Result<(), SyncError> {
        validate_table_name(&self.table_name).map_err(|e| e.with_op("validate_config"))?;
        if self.chunk_size == 0 {
            return Err(SyncError::new(SyncErrorKind::InvalidInput)
                .with_op("validate_config")
                .with_message("chunk size must be at least 1"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = SyncConfig::default();
        assert_eq!(config.db_path, PathBuf::from("sample_reporting.db"));
        assert_eq!(config.table_name, "main_table");
        assert_eq!(config.chunk_size, 1000);
        assert!(config.detect_deletes);
        assert_eq!(config.staging_table(), "main_table_staging");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let bad_table = SyncConfig::default().with_table("main-table");
        assert_eq!(
            bad_table.validate().unwrap_err().kind(),
            SyncErrorKind::InvalidInput
        );

        let zero_chunk = SyncConfig::default().with_chunk_size(0);
        assert_eq!(
            zero_chunk.validate().unwrap_err().kind(),
            SyncErrorKind::InvalidInput
        );
    }
}
