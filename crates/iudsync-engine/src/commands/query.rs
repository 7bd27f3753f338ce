//! Read-side commands over the stored table.

use iudsync_core::errors::{SyncError, SyncErrorKind};
use iudsync_core::model::ChangeRecord;
use iudsync_core::ops::TableStore;
use iudsync_core::{log_op_end, log_op_error, log_op_start};
use iudsync_store::errors::Result;

/// All stored rows of `table`, in insertion order
///
/// An absent table yields no rows.
///
/// # Errors
///
/// `InvalidInput` for a bad table name, `StoreUnavailable` if the table
/// cannot be read.
pub fn query_table<S: TableStore + ?Sized>(store: &S, table: &str) -> Result<Vec<ChangeRecord>> {
    let start = std::time::Instant::now();
    log_op_start!("query_table", table = table);

    match store.read_all(table) {
        Ok(rows) => {
            log_op_end!(
                "query_table",
                duration_ms = start.elapsed().as_millis() as u64,
                rows = rows.len()
            );
            Ok(rows)
        }
        Err(e) => {
            let e = e.with_op("query_table");
            log_op_error!(
                "query_table",
                e.clone(),
                duration_ms = start.elapsed().as_millis() as u64
            );
            Err(e)
        }
    }
}

/// Pretty-printed JSON array of `rows`
///
/// # Errors
///
/// Returns `Internal` if serialization fails.
pub fn render_json(rows: &[ChangeRecord]) -> Result<String> {
    serde_json::to_string_pretty(rows).map_err(|e| {
        SyncError::new(SyncErrorKind::Internal)
            .with_op("render_json")
            .with_message(e.to_string())
    })
}
