//! Persisting a reconciled change set

use crate::errors::SyncError;
use crate::model::ChangeRecord;
use crate::ops::store::TableStore;
use crate::{log_op_end, log_op_error, log_op_start};

/// Replace the table's contents with `records`
///
/// Afterwards the table holds exactly `records`; no prior row survives.
///
/// # Errors
///
/// Returns `StoreUnavailable` if the store cannot be written. The store
/// adapter guarantees the replacement is atomic, so a failure leaves the
/// previous contents in place.
pub fn write_full<S: TableStore + ?Sized>(
    store: &mut S,
    table: &str,
    records: &[ChangeRecord],
) -> Result<(), SyncError> {
    let start = std::time::Instant::now();
    log_op_start!("write_full", table = table, rows = records.len());

    match store.replace_all(table, records) {
        Ok(()) => {
            log_op_end!(
                "write_full",
                duration_ms = start.elapsed().as_millis() as u64
            );
            Ok(())
        }
        Err(e) => {
            let e = e.with_op("write_full");
            log_op_error!(
                "write_full",
                e.clone(),
                duration_ms = start.elapsed().as_millis() as u64,
                table = table
            );
            Err(e)
        }
    }
}

/// Append `records` to the table without removing prior rows
///
/// # Errors
///
/// Returns `StoreUnavailable` if the store cannot be written.
pub fn write_append<S: TableStore + ?Sized>(
    store: &mut S,
    table: &str,
    records: &[ChangeRecord],
) -> Result<(), SyncError> {
    let start = std::time::Instant::now();
    log_op_start!("write_append", table = table, rows = records.len());

    match store.append_rows(table, records) {
        Ok(()) => {
            log_op_end!(
                "write_append",
                duration_ms = start.elapsed().as_millis() as u64
            );
            Ok(())
        }
        Err(e) => {
            let e = e.with_op("write_append");
            log_op_error!(
                "write_append",
                e.clone(),
                duration_ms = start.elapsed().as_millis() as u64,
                table = table
            );
            Err(e)
        }
    }
}
