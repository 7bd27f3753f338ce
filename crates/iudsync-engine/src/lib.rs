//! iudsync Engine - Orchestration layer
//!
//! Provides the upload pipelines (whole-file and chunked) and the query
//! command, coordinating the core reconciler with the store and the CSV
//! loader.

pub mod commands;
pub mod config;

pub use config::SyncConfig;
