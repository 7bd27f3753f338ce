pub mod query;
pub mod upload;
