use std::collections::{HashMap, HashSet};

use crate::errors::{SyncError, SyncErrorKind};
use crate::model::{ChangeRecord, RecordKey};

/// Row store addressed by table name
///
/// Every method fails with `StoreUnavailable` when the backing store cannot
/// be reached. Reads of a table that does not exist return no rows; they
/// are never an error.
pub trait TableStore {
    /// All rows of `table`, in insertion order
    fn read_all(&self, table: &str) -> Result<Vec<ChangeRecord>, SyncError>;

    /// Rows of `table` whose key is one of `keys`, in insertion order
    fn read_keys(&self, table: &str, keys: &[RecordKey]) -> Result<Vec<ChangeRecord>, SyncError>;

    /// At most `limit` rows of `table` starting at row `offset`, in insertion order
    fn read_page(
        &self,
        table: &str,
        offset: usize,
        limit: usize,
    ) -> Result<Vec<ChangeRecord>, SyncError>;

    /// Atomically replace the contents of `table` (creating it if needed)
    fn replace_all(&mut self, table: &str, rows: &[ChangeRecord]) -> Result<(), SyncError>;

    /// Append rows to `table` (creating it if needed); never removes rows
    fn append_rows(&mut self, table: &str, rows: &[ChangeRecord]) -> Result<(), SyncError>;

    /// Atomically make `table` hold exactly the rows of `staging`, then drop `staging`
    fn promote(&mut self, staging: &str, table: &str) -> Result<(), SyncError>;

    /// Remove `table`; a missing table is not an error
    fn drop_table(&mut self, table: &str) -> Result<(), SyncError>;
}

/// Check that a table name is a plain SQL identifier
///
/// Table names are interpolated into SQL, so anything outside
/// `[A-Za-z_][A-Za-z0-9_]*` is refused.
///
/// # Errors
///
/// Returns `InvalidInput` naming the rejected table.
pub fn validate_table_name(table: &str) -> Result<(), SyncError> {
    let mut chars = table.chars();
    let valid = match chars.next() {
        Some(first) => {
            (first.is_ascii_alphabetic() || first == '_')
                && chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
        }
        None => false,
    };
    if valid {
        Ok(())
    } else {
        Err(SyncError::new(SyncErrorKind::InvalidInput)
            .with_op("validate_table_name")
            .with_table(table)
            .with_message("table name must match [A-Za-z_][A-Za-z0-9_]*"))
    }
}

/// In-memory table store
///
/// HashMap-backed, single-threaded. Used by tests and by callers that want
/// to reconcile without touching disk. An "unavailable" store fails every
/// call, which lets tests exercise the `StoreUnavailable` path.
#[derive(Debug, Clone, Default)]
pub struct MemoryTableStore {
    tables: HashMap<String, Vec<ChangeRecord>>,
    unavailable: bool,
    fail_writes_after: Option<usize>,
    writes: usize,
}

impl MemoryTableStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// A store that fails every read and write
    pub fn unavailable() -> Self {
        Self {
            unavailable: true,
            ..Self::default()
        }
    }

    /// Fail every write once `n` writes have been made over the store's lifetime
    ///
    /// `drop_table` is not counted and never fails this way.
    pub fn fail_writes_after(mut self, n: usize) -> Self {
        self.fail_writes_after = Some(n);
        self
    }

    /// Names of the tables currently held
    pub fn table_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.tables.keys().cloned().collect();
        names.sort();
        names
    }

    fn check_read(&self, op: &str, table: &str) -> Result<(), SyncError> {
        validate_table_name(table)?;
        if self.unavailable {
            return Err(unavailable(op, table));
        }
        Ok(())
    }

    fn check_write(&mut self, op: &str, table: &str) -> Result<(), SyncError> {
        self.check_read(op, table)?;
        if let Some(limit) = self.fail_writes_after {
            if self.writes >= limit {
                return Err(unavailable(op, table));
            }
        }
        self.writes += 1;
        Ok(())
    }
}

fn unavailable(op: &str, table: &str) -> SyncError {
    SyncError::new(SyncErrorKind::StoreUnavailable)
        .with_op(op)
        .with_table(table)
        .with_message("memory store is unavailable")
}

impl TableStore for MemoryTableStore {
    fn read_all(&self, table: &str) -> Result<Vec<ChangeRecord>, SyncError> {
        self.check_read("read_all", table)?;
        Ok(self.tables.get(table).cloned().unwrap_or_default())
    }

    fn read_keys(&self, table: &str, keys: &[RecordKey]) -> Result<Vec<ChangeRecord>, SyncError> {
        self.check_read("read_keys", table)?;
        let wanted: HashSet<&RecordKey> = keys.iter().collect();
        Ok(self
            .tables
            .get(table)
            .map(|rows| {
                rows.iter()
                    .filter(|r| wanted.contains(&r.key))
                    .cloned()
                    .collect()
            })
            .unwrap_or_default())
    }

    fn read_page(
        &self,
        table: &str,
        offset: usize,
        limit: usize,
    ) -> Result<Vec<ChangeRecord>, SyncError> {
        self.check_read("read_page", table)?;
        Ok(self
            .tables
            .get(table)
            .map(|rows| rows.iter().skip(offset).take(limit).cloned().collect())
            .unwrap_or_default())
    }

    fn replace_all(&mut self, table: &str, rows: &[ChangeRecord]) -> Result<(), SyncError> {
        self.check_write("replace_all", table)?;
        self.tables.insert(table.to_string(), rows.to_vec());
        Ok(())
    }

    fn append_rows(&mut self, table: &str, rows: &[ChangeRecord]) -> Result<(), SyncError> {
        self.check_write("append_rows", table)?;
        self.tables
            .entry(table.to_string())
            .or_default()
            .extend_from_slice(rows);
        Ok(())
    }

    fn promote(&mut self, staging: &str, table: &str) -> Result<(), SyncError> {
        validate_table_name(staging)?;
        self.check_write("promote", table)?;
        let rows = self.tables.remove(staging).unwrap_or_default();
        self.tables.insert(table.to_string(), rows);
        Ok(())
    }

    fn drop_table(&mut self, table: &str) -> Result<(), SyncError> {
        // cleanup path: not subject to injected write failures
        self.check_read("drop_table", table)?;
        self.tables.remove(table);
        Ok(())
    }
}
