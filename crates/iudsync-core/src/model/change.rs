use crate::errors::ReconcileError;
use crate::model::record::{Payload, Record, RecordKey};
use serde::{Deserialize, Serialize};

/// Three-way classification tag of a reconciled row
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum IudStatus {
    #[serde(rename = "I")]
    Insert,
    #[serde(rename = "U")]
    Update,
    #[serde(rename = "D")]
    Delete,
}

impl IudStatus {
    /// Single-letter tag persisted in the `iud` column
    pub fn code(&self) -> &'static str {
        match self {
            IudStatus::Insert => "I",
            IudStatus::Update => "U",
            IudStatus::Delete => "D",
        }
    }

    /// Parse a persisted tag
    ///
    /// # Errors
    ///
    /// Returns `UnknownStatus` for anything other than `I`, `U` or `D`.
    pub fn from_code(tag: &str) -> Result<Self, ReconcileError> {
        match tag {
            "I" => Ok(IudStatus::Insert),
            "U" => Ok(IudStatus::Update),
            "D" => Ok(IudStatus::Delete),
            other => Err(ReconcileError::UnknownStatus {
                tag: other.to_string(),
            }),
        }
    }
}

impl std::fmt::Display for IudStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.code())
    }
}

/// A reconciled row: key, resolved integer payload, and status tag
///
/// This is also the shape of a persisted row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChangeRecord {
    pub key: RecordKey,
    pub field3: i64,
    pub field4: i64,
    pub field5: i64,
    pub status: IudStatus,
}

impl ChangeRecord {
    pub fn new(key: RecordKey, field3: i64, field4: i64, field5: i64, status: IudStatus) -> Self {
        Self {
            key,
            field3,
            field4,
            field5,
            status,
        }
    }

    /// Convert back into a snapshot record (status is dropped)
    pub fn to_record(&self) -> Record {
        Record::new(
            self.key.clone(),
            Payload::ints(self.field3, self.field4, self.field5),
        )
    }
}
