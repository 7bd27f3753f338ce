//! Canonical schema constants for structured logging and events
//!
//! These constants ensure consistency across all logging and error reporting.

// Canonical field keys for structured logging
pub const FIELD_COMPONENT: &str = "component";
pub const FIELD_OP: &str = "op";
pub const FIELD_EVENT: &str = "event";
pub const FIELD_DURATION_MS: &str = "duration_ms";

// Entity identifiers
pub const FIELD_TABLE: &str = "table";
pub const FIELD_FILE_PATH: &str = "file_path";

// Collection sizes
pub const FIELD_ROWS: &str = "rows";
pub const FIELD_CHUNKS: &str = "chunks";
pub const FIELD_INSERTS: &str = "inserts";
pub const FIELD_UPDATES: &str = "updates";
pub const FIELD_DELETES: &str = "deletes";

// Error fields
pub const FIELD_ERR_CODE: &str = "err.code";
pub const FIELD_ERR_MESSAGE: &str = "err.message";

// Canonical event names
pub const EVENT_START: &str = "start";
pub const EVENT_END: &str = "end";
pub const EVENT_END_ERROR: &str = "end_error";
