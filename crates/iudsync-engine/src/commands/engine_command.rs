//! Engine-level commands dispatched by the CLI.

use std::path::PathBuf;

use iudsync_core::model::ChangeRecord;
use iudsync_core::ops::TableStore;
use iudsync_store::errors::Result;

use crate::commands::query::query_table;
use crate::commands::upload::{upload, UploadReport};
use crate::config::SyncConfig;

/// Engine-level commands that touch the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EngineCommand {
    /// Reconcile a CSV file into the configured table.
    Upload {
        csv_path: PathBuf,
        /// Process the file in chunks instead of all at once.
        large_table: bool,
    },
    /// Read back the configured table.
    Query,
}

/// Result of applying an engine command.
#[derive(Debug, Clone)]
pub enum EngineCommandResult {
    Upload(UploadReport),
    Query(Vec<ChangeRecord>),
}

/// Apply an engine command against `store` using `config`.
///
/// # Errors
///
/// The errors of the dispatched command.
pub fn apply_engine_command<S: TableStore + ?Sized>(
    cmd: EngineCommand,
    store: &mut S,
    config: &SyncConfig,
) -> Result<EngineCommandResult> {
    config.validate()?;
    match cmd {
        EngineCommand::Upload {
            csv_path,
            large_table,
        } => upload(store, &csv_path, large_table, config).map(EngineCommandResult::Upload),
        EngineCommand::Query => {
            query_table(store, &config.table_name).map(EngineCommandResult::Query)
        }
    }
}
