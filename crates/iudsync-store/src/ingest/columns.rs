//! Header resolution

use iudsync_core::errors::{ReconcileError, SyncError};
use iudsync_core::model::record::{COLUMN_FIELD1, COLUMN_FIELD2, PAYLOAD_COLUMNS};
use iudsync_core::model::{Payload, Record, RecordKey, Value};

/// Positions of the known columns within a CSV header
///
/// Extra columns are ignored. Payload columns may be missing, in which case
/// their cells load as absent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnMap {
    field1: usize,
    field2: usize,
    payload: [Option<usize>; 3],
}

impl ColumnMap {
    /// Resolve column positions from a header row
    ///
    /// # Errors
    ///
    /// Returns `MalformedInput` naming the missing key column.
    pub fn from_headers(headers: &csv::StringRecord) -> Result<Self, SyncError> {
        let position = |name: &str| headers.iter().position(|h| h.trim() == name);

        let field1 = position(COLUMN_FIELD1).ok_or(ReconcileError::MissingKeyColumn {
            column: COLUMN_FIELD1,
        })?;
        let field2 = position(COLUMN_FIELD2).ok_or(ReconcileError::MissingKeyColumn {
            column: COLUMN_FIELD2,
        })?;

        let payload = PAYLOAD_COLUMNS.map(position);
        Ok(Self {
            field1,
            field2,
            payload,
        })
    }

    /// Names of payload columns the header does not carry
    pub fn missing_payload_columns(&self) -> Vec<&'static str> {
        PAYLOAD_COLUMNS
            .iter()
            .zip(self.payload.iter())
            .filter(|(_, idx)| idx.is_none())
            .map(|(name, _)| *name)
            .collect()
    }

    /// Parse one data row; `line` is the 1-based file line, for errors
    pub fn parse_row(&self, row: &csv::StringRecord, line: u64) -> Result<Record, ReconcileError> {
        let raw_field1 = row.get(self.field1).unwrap_or("");
        let field1: i64 =
            raw_field1
                .trim()
                .parse()
                .map_err(|_| ReconcileError::InvalidKeyValue {
                    column: COLUMN_FIELD1,
                    value: raw_field1.to_string(),
                    line,
                })?;

        // the key keeps the cell verbatim; " a" and "a" are different keys
        let field2 = row.get(self.field2).unwrap_or("");
        if field2.trim().is_empty() {
            return Err(ReconcileError::InvalidKeyValue {
                column: COLUMN_FIELD2,
                value: field2.to_string(),
                line,
            });
        }

        let cell = |idx: Option<usize>| idx.and_then(|i| row.get(i)).and_then(Value::parse);
        let payload = Payload {
            field3: cell(self.payload[0]),
            field4: cell(self.payload[1]),
            field5: cell(self.payload[2]),
        };

        Ok(Record::new(RecordKey::new(field1, field2), payload))
    }
}
