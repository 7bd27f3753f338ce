//! Correlation types for run tracking
//!
//! A run is one `upload` invocation. Every log line emitted while the run is
//! in progress carries its `run_id`, and chunked uploads tag per-chunk events
//! with a `ChunkId` so a failing chunk can be located in the log file.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for a single upload run
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RunId(String);

impl RunId {
    /// Generate a new random RunId using UUIDv7
    pub fn new() -> Self {
        Self(Uuid::now_v7().to_string())
    }

    /// Get the string representation
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for RunId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for RunId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Position of a chunk within a chunked upload (zero-based, file order)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ChunkId {
    pub run_ordinal: usize,
}

impl ChunkId {
    pub fn new(run_ordinal: usize) -> Self {
        Self { run_ordinal }
    }

    /// The chunk that follows this one
    pub fn next(self) -> Self {
        Self {
            run_ordinal: self.run_ordinal + 1,
        }
    }
}

impl std::fmt::Display for ChunkId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "chunk#{}", self.run_ordinal)
    }
}
