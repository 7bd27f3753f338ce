//! Reading the stored side of a reconciliation

use crate::model::{RecordKey, Snapshot};
use crate::ops::store::TableStore;
use crate::{log_op_end, log_op_error, log_op_start};

/// Read the whole stored table as a snapshot
///
/// A missing or empty table yields an empty snapshot, which is the signal
/// for a first-time load.
///
/// # Errors
///
/// Returns `StoreUnavailable` if the store cannot be read.
pub fn load_existing<S: TableStore + ?Sized>(
    store: &S,
    table: &str,
) -> Result<Snapshot, crate::SyncError> {
    let start = std::time::Instant::now();
    log_op_start!("load_existing", table = table);

    match store.read_all(table) {
        Ok(rows) => {
            let snapshot: Snapshot = rows.iter().map(|r| r.to_record()).collect();
            log_op_end!(
                "load_existing",
                duration_ms = start.elapsed().as_millis() as u64,
                rows = snapshot.len()
            );
            Ok(snapshot)
        }
        Err(e) => {
            log_op_error!(
                "load_existing",
                e.clone(),
                duration_ms = start.elapsed().as_millis() as u64
            );
            Err(e)
        }
    }
}

/// Read only the stored rows whose key is in `keys`
///
/// Used per chunk so the stored side never has to be held in full.
///
/// # Errors
///
/// Returns `StoreUnavailable` if the store cannot be read.
pub fn load_existing_for_keys<S: TableStore + ?Sized>(
    store: &S,
    table: &str,
    keys: &[RecordKey],
) -> Result<Snapshot, crate::SyncError> {
    let rows = store.read_keys(table, keys)?;
    tracing::debug!(
        table = table,
        requested = keys.len(),
        matched = rows.len(),
        "loaded stored rows for chunk keys"
    );
    Ok(rows.iter().map(|r| r.to_record()).collect())
}
