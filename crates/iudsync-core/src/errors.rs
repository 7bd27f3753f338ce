use crate::model::RecordKey;
use thiserror::Error;

/// Result type alias using ReconcileError
pub type Result<T> = std::result::Result<T, ReconcileError>;

// ========== Error Facility ==========

/// Canonical error kind taxonomy
///
/// Each kind maps to a stable error code that can be used for programmatic
/// error handling, testing, and log filtering. Every kind except `Internal`
/// aborts the current run; none of them is retried automatically.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncErrorKind {
    // Input
    /// Key columns missing or unparsable in the source file
    MalformedInput,
    /// A resolved payload value cannot be coerced to an integer
    TypeCoercion,
    /// The same composite key appears twice within one snapshot
    DuplicateKey,

    // Persistence
    /// The table store cannot be opened, read, or written
    StoreUnavailable,

    // Configuration/IO
    InvalidInput,
    Io,

    // Internal
    Internal,
}

impl SyncErrorKind {
    /// Get the stable error code for this kind
    pub fn code(&self) -> &'static str {
        match self {
            SyncErrorKind::MalformedInput => "ERR_MALFORMED_INPUT",
            SyncErrorKind::TypeCoercion => "ERR_TYPE_COERCION",
            SyncErrorKind::DuplicateKey => "ERR_DUPLICATE_KEY",
            SyncErrorKind::StoreUnavailable => "ERR_STORE_UNAVAILABLE",
            SyncErrorKind::InvalidInput => "ERR_INVALID_INPUT",
            SyncErrorKind::Io => "ERR_IO",
            SyncErrorKind::Internal => "ERR_INTERNAL",
        }
    }
}

/// Canonical structured error type
///
/// Carries the classification kind plus enough context (table, file, key,
/// line, chunk) to diagnose a failed run from the error message alone.
#[derive(Debug, Clone)]
pub struct SyncError {
    kind: SyncErrorKind,
    op: Option<String>,
    table: Option<String>,
    file_path: Option<String>,
    key: Option<String>,
    line: Option<u64>,
    column: Option<String>,
    chunk: Option<usize>,
    message: String,
}

impl SyncError {
    /// Create a new error with the specified kind
    pub fn new(kind: SyncErrorKind) -> Self {
        Self {
            kind,
            op: None,
            table: None,
            file_path: None,
            key: None,
            line: None,
            column: None,
            chunk: None,
            message: String::new(),
        }
    }

    /// Add operation context
    pub fn with_op(mut self, op: impl Into<String>) -> Self {
        self.op = Some(op.into());
        self
    }

    /// Add table name context
    pub fn with_table(mut self, table: impl Into<String>) -> Self {
        self.table = Some(table.into());
        self
    }

    /// Add source file context
    pub fn with_file_path(mut self, path: impl Into<String>) -> Self {
        self.file_path = Some(path.into());
        self
    }

    /// Add offending key context
    pub fn with_key(mut self, key: &RecordKey) -> Self {
        self.key = Some(key.to_string());
        self
    }

    /// Add line number context (1-based, header is line 1)
    pub fn with_line(mut self, line: u64) -> Self {
        self.line = Some(line);
        self
    }

    /// Add column name context
    pub fn with_column(mut self, column: impl Into<String>) -> Self {
        self.column = Some(column.into());
        self
    }

    /// Add chunk ordinal context
    pub fn with_chunk(mut self, chunk: usize) -> Self {
        self.chunk = Some(chunk);
        self
    }

    /// Add custom message
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = message.into();
        self
    }

    /// Get the error kind
    pub fn kind(&self) -> SyncErrorKind {
        self.kind
    }

    /// Get the stable error code
    pub fn code(&self) -> &'static str {
        self.kind.code()
    }

    pub fn op(&self) -> Option<&str> {
        self.op.as_deref()
    }

    pub fn table(&self) -> Option<&str> {
        self.table.as_deref()
    }

    pub fn file_path(&self) -> Option<&str> {
        self.file_path.as_deref()
    }

    /// Get the offending key rendered as `(field1, "field2")`, if any
    pub fn key(&self) -> Option<&str> {
        self.key.as_deref()
    }

    pub fn line(&self) -> Option<u64> {
        self.line
    }

    pub fn column(&self) -> Option<&str> {
        self.column.as_deref()
    }

    pub fn chunk(&self) -> Option<usize> {
        self.chunk
    }

    /// Get the error message
    pub fn message(&self) -> &str {
        &self.message
    }
}

impl std::fmt::Display for SyncError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}]", self.code())?;
        if let Some(op) = &self.op {
            write!(f, " in operation '{}'", op)?;
        }
        if !self.message.is_empty() {
            write!(f, ": {}", self.message)?;
        }
        if let Some(table) = &self.table {
            write!(f, " (table: {})", table)?;
        }
        if let Some(path) = &self.file_path {
            write!(f, " (file: {})", path)?;
        }
        if let Some(line) = self.line {
            write!(f, " (line: {})", line)?;
        }
        if let Some(column) = &self.column {
            write!(f, " (column: {})", column)?;
        }
        if let Some(chunk) = self.chunk {
            write!(f, " (chunk: {})", chunk)?;
        }
        if let Some(key) = &self.key {
            write!(f, " (key: {})", key)?;
        }
        Ok(())
    }
}

impl std::error::Error for SyncError {}

// ========== End Error Facility ==========

/// Which snapshot of a reconciliation an error refers to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    Old,
    New,
}

impl std::fmt::Display for Side {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Side::Old => write!(f, "old"),
            Side::New => write!(f, "new"),
        }
    }
}

/// Domain errors raised by the model and the reconciler
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ReconcileError {
    /// Two records in one snapshot share a composite key
    #[error("Duplicate key {key} in {side} snapshot")]
    DuplicateKey { side: Side, key: RecordKey },

    /// A resolved payload cell is absent or not an integer
    #[error("Cannot coerce {field} of {key} to integer: {value}")]
    TypeCoercion {
        key: RecordKey,
        field: &'static str,
        value: String,
    },

    /// A required key column is missing from the header
    #[error("Required column {column} is missing")]
    MissingKeyColumn { column: &'static str },

    /// A key cell is empty or cannot be parsed
    #[error("Invalid {column} value {value:?} at line {line}")]
    InvalidKeyValue {
        column: &'static str,
        value: String,
        line: u64,
    },

    /// A stored status tag is not one of I/U/D
    #[error("Unknown status tag: {tag}")]
    UnknownStatus { tag: String },

    #[error("Internal error: {message}")]
    Internal { message: String },
}

impl From<ReconcileError> for SyncError {
    fn from(err: ReconcileError) -> Self {
        match err {
            ReconcileError::DuplicateKey { side, key } => SyncError::new(SyncErrorKind::DuplicateKey)
                .with_key(&key)
                .with_message(format!("Duplicate key in {} snapshot", side)),

            ReconcileError::TypeCoercion { key, field, value } => {
                SyncError::new(SyncErrorKind::TypeCoercion)
                    .with_key(&key)
                    .with_column(field)
                    .with_message(format!("Cannot coerce {} to integer", value))
            }

            ReconcileError::MissingKeyColumn { column } => {
                SyncError::new(SyncErrorKind::MalformedInput)
                    .with_column(column)
                    .with_message("Required key column is missing from header")
            }

            ReconcileError::InvalidKeyValue {
                column,
                value,
                line,
            } => SyncError::new(SyncErrorKind::MalformedInput)
                .with_column(column)
                .with_line(line)
                .with_message(format!("Invalid key value {:?}", value)),

            ReconcileError::UnknownStatus { tag } => {
                SyncError::new(SyncErrorKind::StoreUnavailable)
                    .with_message(format!("Corrupt row: unknown status tag {:?}", tag))
            }

            ReconcileError::Internal { message } => {
                SyncError::new(SyncErrorKind::Internal).with_message(message)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_includes_context() {
        let err = SyncError::new(SyncErrorKind::StoreUnavailable)
            .with_op("write_full")
            .with_table("main_table")
            .with_message("disk I/O error");

        let rendered = err.to_string();
        assert!(rendered.starts_with("[ERR_STORE_UNAVAILABLE]"));
        assert!(rendered.contains("write_full"));
        assert!(rendered.contains("main_table"));
        assert!(rendered.contains("disk I/O error"));
    }

    #[test]
    fn test_side_display() {
        assert_eq!(Side::Old.to_string(), "old");
        assert_eq!(Side::New.to_string(), "new");
    }
}
