//! Snapshot reconciliation engine.
//!
//! Aligns an old and a new snapshot on the composite key and produces the
//! IUD change set that brings the stored table to the new state.
//!
//! ## Entry point
//!
//! ```
//! use iudsync_core::model::{IudStatus, Record, Snapshot};
//! use iudsync_core::reconcile::reconcile;
//!
//! let old = Snapshot::new(vec![Record::ints(1, "a", 10, 20, 30)]);
//! let new = Snapshot::new(vec![Record::ints(1, "a", 99, 20, 30)]);
//!
//! let changes = reconcile(&old, &new).unwrap();
//! assert_eq!(changes[0].status, IudStatus::Update);
//! assert_eq!(changes[0].field3, 99);
//! ```
//!
//! ## Guarantees
//!
//! - **Partition**: every key of either snapshot yields exactly one change record.
//! - **Non-diffing updates**: a key present on both sides is always an Update,
//!   even when the payload is unchanged.
//! - **Determinism**: Inserts, then Updates, then Deletes, key order within each group.
//! - **No partial output**: duplicate keys or uncoercible payloads fail the whole call.

pub mod engine;
pub mod summary;

pub use engine::{align, classify, reconcile};
pub use summary::{render_human_summary, ChangeSummary};
