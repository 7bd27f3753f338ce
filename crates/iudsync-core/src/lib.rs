//! iudsync Core - snapshot reconciliation kernel
//!
//! This crate provides the domain model and the algorithms for reconciling an
//! incoming tabular snapshot against the stored one:
//! - Record / Snapshot / AlignedRow / ChangeRecord models
//! - The IUD reconciler (full outer join, classification, integer coercion)
//! - The `TableStore` adapter trait with an in-memory implementation
//! - Loader and writer glue over any `TableStore`
//! - Structured error and logging facilities

pub mod errors;
pub mod logging_facility;
pub mod model;
pub mod ops;
pub mod reconcile;
pub mod render;

pub use iudsync_core_types as core_types;

// Re-export commonly used types
pub use errors::{ReconcileError, Side, SyncError, SyncErrorKind};
pub use model::{AlignedRow, ChangeRecord, IudStatus, Payload, Record, RecordKey, Snapshot, Value};
pub use ops::{MemoryTableStore, TableStore};
pub use reconcile::{reconcile, ChangeSummary};
