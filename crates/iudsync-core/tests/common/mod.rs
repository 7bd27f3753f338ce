use iudsync_core::model::{ChangeRecord, IudStatus, Record, RecordKey, Snapshot};

/// Build a snapshot of all-integer records from `(field1, field2, f3, f4, f5)` tuples
#[allow(dead_code)]
pub fn snapshot_of(rows: &[(i64, &str, i64, i64, i64)]) -> Snapshot {
    rows.iter()
        .map(|&(f1, f2, f3, f4, f5)| Record::ints(f1, f2, f3, f4, f5))
        .collect()
}

/// Keys of the change records carrying `status`, in output order
#[allow(dead_code)]
pub fn keys_with_status(changes: &[ChangeRecord], status: IudStatus) -> Vec<RecordKey> {
    changes
        .iter()
        .filter(|c| c.status == status)
        .map(|c| c.key.clone())
        .collect()
}

#[allow(dead_code)]
pub fn key(field1: i64, field2: &str) -> RecordKey {
    RecordKey::new(field1, field2)
}
