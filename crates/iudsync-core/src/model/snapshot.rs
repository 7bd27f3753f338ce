use std::collections::HashSet;

use crate::errors::{ReconcileError, Side};
use crate::model::record::{Payload, Record, RecordKey};

/// Ordered collection of records, either the stored state or an incoming file
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Snapshot {
    records: Vec<Record>,
}

impl Snapshot {
    pub fn new(records: Vec<Record>) -> Self {
        Self { records }
    }

    pub fn empty() -> Self {
        Self::default()
    }

    pub fn records(&self) -> &[Record] {
        &self.records
    }

    pub fn into_records(self) -> Vec<Record> {
        self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn push(&mut self, record: Record) {
        self.records.push(record);
    }

    pub fn keys(&self) -> impl Iterator<Item = &RecordKey> {
        self.records.iter().map(|r| &r.key)
    }

    /// Check the per-snapshot key uniqueness invariant
    ///
    /// # Errors
    ///
    /// Returns `DuplicateKey` naming the first key seen twice.
    pub fn ensure_unique_keys(&self, side: Side) -> Result<(), ReconcileError> {
        let mut seen = HashSet::with_capacity(self.records.len());
        for record in &self.records {
            if !seen.insert(&record.key) {
                return Err(ReconcileError::DuplicateKey {
                    side,
                    key: record.key.clone(),
                });
            }
        }
        Ok(())
    }
}

impl FromIterator<Record> for Snapshot {
    fn from_iter<I: IntoIterator<Item = Record>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

/// Result of outer-joining two snapshots on the composite key
///
/// `old` is `None` when the key exists only in the new snapshot, `new` is
/// `None` when it exists only in the old one. At least one side is present.
#[derive(Debug, Clone, PartialEq)]
pub struct AlignedRow {
    pub key: RecordKey,
    pub old: Option<Payload>,
    pub new: Option<Payload>,
}
