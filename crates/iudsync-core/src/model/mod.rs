pub mod change;
pub mod record;
pub mod snapshot;

pub use change::{ChangeRecord, IudStatus};
pub use record::{Payload, Record, RecordKey, Value};
pub use snapshot::{AlignedRow, Snapshot};
