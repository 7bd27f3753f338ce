//! Upload orchestration: reconcile an input file against the stored table.
//!
//! ## Whole-file mode
//! 1. Load the stored table
//! 2. Load the whole input file
//! 3. Reconcile and replace the table in one write
//!
//! ## Chunked mode
//! 1. Reset the staging table
//! 2. Per chunk: reject keys seen in earlier chunks, read the stored rows
//!    for the chunk's keys, reconcile, append to staging
//! 3. Final pass over the stored table: rows never seen become Deletes (or
//!    are carried over unchanged when delete detection is off)
//! 4. Promote staging over the table
//!
//! A failed chunked run drops the staging table and leaves the stored table
//! as it was.

use std::collections::HashSet;
use std::fmt;
use std::path::Path;

use iudsync_core::errors::{ReconcileError, Side, SyncError};
use iudsync_core::model::{ChangeRecord, IudStatus, RecordKey};
use iudsync_core::ops::{load_existing, load_existing_for_keys, write_append, write_full, TableStore};
use iudsync_core::reconcile::{reconcile, ChangeSummary};
use iudsync_core::{log_op_end, log_op_error, log_op_start};
use iudsync_core_types::{ChunkId, RunId};
use iudsync_store::errors::Result;
use iudsync_store::CsvSource;
use serde::Serialize;

use crate::config::SyncConfig;

/// How an upload was processed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum UploadMode {
    Full,
    Chunked,
}

impl fmt::Display for UploadMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UploadMode::Full => write!(f, "full"),
            UploadMode::Chunked => write!(f, "chunked"),
        }
    }
}

/// Outcome of a successful upload
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UploadReport {
    pub run_id: String,
    pub mode: UploadMode,
    /// The stored table was empty before the run
    pub first_load: bool,
    /// Input chunks processed (1 in whole-file mode)
    pub chunks: usize,
    pub summary: ChangeSummary,
}

/// Open `csv_path` and run the upload in the mode `large_table` selects
///
/// # Errors
///
/// Any error of [`CsvSource::open`], [`upload_full`] or [`upload_chunked`].
pub fn upload<S: TableStore + ?Sized>(
    store: &mut S,
    csv_path: &Path,
    large_table: bool,
    config: &SyncConfig,
) -> Result<UploadReport> {
    config.validate()?;
    let source = CsvSource::open(csv_path)?;
    if large_table {
        upload_chunked(store, &source, config)
    } else {
        upload_full(store, &source, config)
    }
}

/// Reconcile the whole input file against the whole stored table
///
/// # Errors
///
/// `MalformedInput`, `DuplicateKey` or `TypeCoercion` before anything is
/// written; `StoreUnavailable` if the table cannot be read or replaced.
pub fn upload_full<S: TableStore + ?Sized>(
    store: &mut S,
    source: &CsvSource,
    config: &SyncConfig,
) -> Result<UploadReport> {
    let run_id = RunId::new();
    let _span = tracing::info_span!(
        "upload",
        run_id = %run_id,
        table = %config.table_name,
        mode = %UploadMode::Full
    )
    .entered();

    let start = std::time::Instant::now();
    log_op_start!("upload_full", file_path = %source.path().display());

    match run_full(store, source, config) {
        Ok((first_load, summary)) => {
            log_op_end!(
                "upload_full",
                duration_ms = start.elapsed().as_millis() as u64,
                inserts = summary.inserts,
                updates = summary.updates,
                deletes = summary.deletes
            );
            Ok(UploadReport {
                run_id: run_id.to_string(),
                mode: UploadMode::Full,
                first_load,
                chunks: 1,
                summary,
            })
        }
        Err(e) => {
            log_op_error!(
                "upload_full",
                e.clone(),
                duration_ms = start.elapsed().as_millis() as u64
            );
            Err(e)
        }
    }
}

fn run_full<S: TableStore + ?Sized>(
    store: &mut S,
    source: &CsvSource,
    config: &SyncConfig,
) -> Result<(bool, ChangeSummary)> {
    config.validate()?;
    let table = config.table_name.as_str();

    let old = load_existing(store, table)?;
    let new = source.load()?;
    let changes = reconcile(&old, &new).map_err(|e| {
        SyncError::from(e)
            .with_op("reconcile")
            .with_table(table)
            .with_file_path(source.path().display().to_string())
    })?;

    write_full(store, table, &changes)?;
    Ok((old.is_empty(), ChangeSummary::from_records(&changes)))
}

/// Reconcile the input file chunk by chunk, holding one chunk at a time
///
/// # Errors
///
/// The errors of [`upload_full`], plus `DuplicateKey` for a key repeated
/// across chunks. On any error the staging table is dropped and the stored
/// table is unchanged.
pub fn upload_chunked<S: TableStore + ?Sized>(
    store: &mut S,
    source: &CsvSource,
    config: &SyncConfig,
) -> Result<UploadReport> {
    let run_id = RunId::new();
    let _span = tracing::info_span!(
        "upload",
        run_id = %run_id,
        table = %config.table_name,
        mode = %UploadMode::Chunked
    )
    .entered();

    let start = std::time::Instant::now();
    log_op_start!(
        "upload_chunked",
        file_path = %source.path().display(),
        chunk_size = config.chunk_size
    );

    match run_chunked(store, source, config) {
        Ok(outcome) => {
            log_op_end!(
                "upload_chunked",
                duration_ms = start.elapsed().as_millis() as u64,
                chunks = outcome.chunks,
                inserts = outcome.summary.inserts,
                updates = outcome.summary.updates,
                deletes = outcome.summary.deletes
            );
            Ok(UploadReport {
                run_id: run_id.to_string(),
                mode: UploadMode::Chunked,
                first_load: outcome.first_load,
                chunks: outcome.chunks,
                summary: outcome.summary,
            })
        }
        Err(e) => {
            log_op_error!(
                "upload_chunked",
                e.clone(),
                duration_ms = start.elapsed().as_millis() as u64
            );
            Err(e)
        }
    }
}

struct ChunkedOutcome {
    first_load: bool,
    chunks: usize,
    summary: ChangeSummary,
}

fn run_chunked<S: TableStore + ?Sized>(
    store: &mut S,
    source: &CsvSource,
    config: &SyncConfig,
) -> Result<ChunkedOutcome> {
    config.validate()?;
    let staging = config.staging_table();

    // leftovers of an earlier failed run
    store.drop_table(&staging)?;

    let staged = fill_staging(store, source, config, &staging)
        .and_then(|outcome| store.promote(&staging, &config.table_name).map(|()| outcome));

    if staged.is_err() {
        if let Err(drop_err) = store.drop_table(&staging) {
            tracing::warn!(
                table = %staging,
                err.code = drop_err.code(),
                err.message = %drop_err,
                "could not drop staging table after failed run"
            );
        }
    }
    staged
}

fn fill_staging<S: TableStore + ?Sized>(
    store: &mut S,
    source: &CsvSource,
    config: &SyncConfig,
    staging: &str,
) -> Result<ChunkedOutcome> {
    let table = config.table_name.as_str();
    let first_load = store.read_page(table, 0, 1)?.is_empty();

    let mut seen: HashSet<RecordKey> = HashSet::new();
    let mut summary = ChangeSummary::default();
    let mut chunk_id = ChunkId::new(0);
    let mut chunks = 0;

    for chunk in source.chunks(config.chunk_size)? {
        let chunk = chunk?;
        let in_context = |e: SyncError| e.with_chunk(chunk_id.run_ordinal).with_table(table);

        if let Some(repeated) = chunk.keys().find(|k| seen.contains(*k)) {
            return Err(in_context(
                ReconcileError::DuplicateKey {
                    side: Side::New,
                    key: repeated.clone(),
                }
                .into(),
            )
            .with_op("upload_chunked"));
        }

        let keys: Vec<RecordKey> = chunk.keys().cloned().collect();
        let old = load_existing_for_keys(store, table, &keys).map_err(in_context)?;
        let changes = reconcile(&old, &chunk)
            .map_err(|e| in_context(SyncError::from(e)).with_op("reconcile"))?;

        write_append(store, staging, &changes).map_err(in_context)?;
        summary.absorb(&changes);
        tracing::debug!(
            chunk = %chunk_id,
            rows = chunk.len(),
            matched = old.len(),
            "chunk staged"
        );

        seen.extend(keys);
        chunk_id = chunk_id.next();
        chunks += 1;
    }

    let tail = carry_unseen(store, config, staging, &seen)?;
    summary.deletes += tail;

    Ok(ChunkedOutcome {
        first_load,
        chunks,
        summary,
    })
}

/// Page through the stored table and stage every row whose key was not in
/// the input. Returns the number of rows tagged as Deletes.
fn carry_unseen<S: TableStore + ?Sized>(
    store: &mut S,
    config: &SyncConfig,
    staging: &str,
    seen: &HashSet<RecordKey>,
) -> Result<usize> {
    let table = config.table_name.as_str();
    let mut unseen: HashSet<RecordKey> = HashSet::new();
    let mut deletes = 0;
    let mut offset = 0;

    loop {
        let page = store.read_page(table, offset, config.chunk_size)?;
        if page.is_empty() {
            break;
        }
        offset += page.len();

        let mut carried: Vec<ChangeRecord> = Vec::new();
        for row in page.into_iter().filter(|r| !seen.contains(&r.key)) {
            if !unseen.insert(row.key.clone()) {
                return Err(SyncError::from(ReconcileError::DuplicateKey {
                    side: Side::Old,
                    key: row.key,
                })
                .with_op("upload_chunked")
                .with_table(table));
            }
            carried.push(if config.detect_deletes {
                ChangeRecord {
                    status: IudStatus::Delete,
                    ..row
                }
            } else {
                row
            });
        }

        if !carried.is_empty() {
            write_append(store, staging, &carried)?;
            if config.detect_deletes {
                deletes += carried.len();
            }
        }
    }

    tracing::debug!(
        table = table,
        carried = unseen.len(),
        deletes = deletes,
        "final pass over stored rows"
    );
    Ok(deletes)
}
