//! Full outer join, IUD classification, and payload resolution.

use std::collections::BTreeMap;

use crate::errors::{ReconcileError, Result, Side};
use crate::model::{AlignedRow, ChangeRecord, IudStatus, Payload, RecordKey, Snapshot, Value};

/// Outer-join two snapshots on `(field1, field2)`.
///
/// Returns one aligned row per distinct key, in key order. Callers must have
/// checked key uniqueness; a repeated key on one side keeps the last record.
pub fn align(old: &Snapshot, new: &Snapshot) -> Vec<AlignedRow> {
    let mut joined: BTreeMap<&RecordKey, (Option<&Payload>, Option<&Payload>)> = BTreeMap::new();

    for record in old.records() {
        joined.entry(&record.key).or_default().0 = Some(&record.payload);
    }
    for record in new.records() {
        joined.entry(&record.key).or_default().1 = Some(&record.payload);
    }

    joined
        .into_iter()
        .map(|(key, (old, new))| AlignedRow {
            key: key.clone(),
            old: old.cloned(),
            new: new.cloned(),
        })
        .collect()
}

/// Classify an aligned row by which sides carry the key.
///
/// # Errors
///
/// Returns `Internal` for a row with neither side present, which `align`
/// never produces.
pub fn classify(row: &AlignedRow) -> Result<IudStatus> {
    match (&row.old, &row.new) {
        (None, Some(_)) => Ok(IudStatus::Insert),
        (Some(_), Some(_)) => Ok(IudStatus::Update),
        (Some(_), None) => Ok(IudStatus::Delete),
        (None, None) => Err(ReconcileError::Internal {
            message: format!("aligned row {} has no side", row.key),
        }),
    }
}

/// Coerce one resolved cell to an integer.
fn coerce(key: &RecordKey, field: &'static str, cell: Option<&Value>) -> Result<i64> {
    match cell {
        Some(value) => value.as_i64().ok_or_else(|| ReconcileError::TypeCoercion {
            key: key.clone(),
            field,
            value: value.to_string(),
        }),
        None => Err(ReconcileError::TypeCoercion {
            key: key.clone(),
            field,
            value: "<absent>".to_string(),
        }),
    }
}

/// Build a change record from the payload chosen for `status`.
fn resolve(key: &RecordKey, payload: &Payload, status: IudStatus) -> Result<ChangeRecord> {
    let [f3, f4, f5] = payload.cells();
    Ok(ChangeRecord::new(
        key.clone(),
        coerce(key, f3.0, f3.1)?,
        coerce(key, f4.0, f4.1)?,
        coerce(key, f5.0, f5.1)?,
        status,
    ))
}

/// Reconcile a stored snapshot against an incoming one.
///
/// An empty `old` short-circuits to "everything is an Insert" without
/// joining. Output is grouped Inserts, Updates, Deletes, each in key order.
///
/// # Errors
///
/// - `DuplicateKey` if a key repeats within `old` or within `new`
/// - `TypeCoercion` if a resolved payload cell is absent or not an integer
pub fn reconcile(old: &Snapshot, new: &Snapshot) -> Result<Vec<ChangeRecord>> {
    old.ensure_unique_keys(Side::Old)?;
    new.ensure_unique_keys(Side::New)?;

    if old.is_empty() {
        let mut inserts = new
            .records()
            .iter()
            .map(|r| resolve(&r.key, &r.payload, IudStatus::Insert))
            .collect::<Result<Vec<_>>>()?;
        inserts.sort_by(|a, b| a.key.cmp(&b.key));
        return Ok(inserts);
    }

    let mut inserts = Vec::new();
    let mut updates = Vec::new();
    let mut deletes = Vec::new();

    for row in align(old, new) {
        let status = classify(&row)?;
        let (payload, bucket) = match status {
            IudStatus::Insert => (row.new.as_ref(), &mut inserts),
            IudStatus::Update => (row.new.as_ref(), &mut updates),
            IudStatus::Delete => (row.old.as_ref(), &mut deletes),
        };
        let payload = payload.ok_or_else(|| ReconcileError::Internal {
            message: format!("resolved side missing for {}", row.key),
        })?;
        bucket.push(resolve(&row.key, payload, status)?);
    }

    let mut out = inserts;
    out.append(&mut updates);
    out.append(&mut deletes);
    Ok(out)
}
