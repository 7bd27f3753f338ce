pub mod loader;
pub mod store;
pub mod writer;

pub use loader::{load_existing, load_existing_for_keys};
pub use store::{validate_table_name, MemoryTableStore, TableStore};
pub use writer::{write_append, write_full};
