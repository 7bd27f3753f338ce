//! Repository layer: `TableStore` over SQLite

mod sqlite_table;

pub use sqlite_table::SqliteTableStore;
