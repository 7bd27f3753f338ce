//! Loading incoming snapshots from CSV files

mod columns;
mod csv_source;

pub use columns::ColumnMap;
pub use csv_source::{ChunkIter, CsvSource};
