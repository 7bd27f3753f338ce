//! Whole-file and chunked CSV loading

use std::fs::File;
use std::path::{Path, PathBuf};

use iudsync_core::errors::{SyncError, SyncErrorKind};
use iudsync_core::model::Snapshot;
use iudsync_core::{log_op_end, log_op_error, log_op_start};

use crate::errors::{csv_error, Result};
use crate::ingest::columns::ColumnMap;

/// An incoming CSV file with a validated header
#[derive(Debug, Clone)]
pub struct CsvSource {
    path: PathBuf,
}

impl CsvSource {
    /// Open `path` and validate its header
    ///
    /// # Errors
    ///
    /// `Io` if the file cannot be opened, `MalformedInput` if the header
    /// lacks `Field1` or `Field2`.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let (_, columns) = open_reader(&path)?;

        let missing = columns.missing_payload_columns();
        if !missing.is_empty() {
            tracing::warn!(
                file_path = %path.display(),
                missing = ?missing,
                "payload columns missing from header; their values load as absent"
            );
        }

        Ok(Self { path })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Parse the whole file into one snapshot
    ///
    /// # Errors
    ///
    /// `MalformedInput` on the first unreadable row or bad key cell, with
    /// file path and line in context.
    pub fn load(&self) -> Result<Snapshot> {
        let start = std::time::Instant::now();
        let file_path = self.path.display().to_string();
        log_op_start!("load_new", file_path = %file_path);

        let result = self.chunks(usize::MAX).and_then(|mut iter| iter.read_chunk());

        match result {
            Ok(snapshot) => {
                log_op_end!(
                    "load_new",
                    duration_ms = start.elapsed().as_millis() as u64,
                    rows = snapshot.len()
                );
                Ok(snapshot)
            }
            Err(e) => {
                log_op_error!(
                    "load_new",
                    e.clone(),
                    duration_ms = start.elapsed().as_millis() as u64
                );
                Err(e)
            }
        }
    }

    /// Iterate over the file in chunks of at most `chunk_size` rows
    ///
    /// Each call re-opens the file, so the iteration can be restarted.
    ///
    /// # Errors
    ///
    /// `InvalidInput` if `chunk_size` is zero; the same errors as
    /// [`CsvSource::open`] if the file cannot be re-opened.
    pub fn chunks(&self, chunk_size: usize) -> Result<ChunkIter> {
        if chunk_size == 0 {
            return Err(SyncError::new(SyncErrorKind::InvalidInput)
                .with_op("load_new_chunked")
                .with_file_path(self.path.display().to_string())
                .with_message("chunk size must be at least 1"));
        }
        let (reader, columns) = open_reader(&self.path)?;
        Ok(ChunkIter {
            reader,
            columns,
            path: self.path.clone(),
            chunk_size,
            next_chunk: 0,
            done: false,
        })
    }
}

fn open_reader(path: &Path) -> Result<(csv::Reader<File>, ColumnMap)> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .from_path(path)
        .map_err(|e| csv_error("open_csv", path, e))?;
    let headers = reader
        .headers()
        .map_err(|e| csv_error("open_csv", path, e))?
        .clone();
    let columns = ColumnMap::from_headers(&headers).map_err(|e| {
        e.with_op("open_csv")
            .with_file_path(path.display().to_string())
    })?;
    Ok((reader, columns))
}

/// Lazy, finite iterator over the chunks of a CSV file, in file order
///
/// Stops after yielding the first error.
pub struct ChunkIter {
    reader: csv::Reader<File>,
    columns: ColumnMap,
    path: PathBuf,
    chunk_size: usize,
    next_chunk: usize,
    done: bool,
}

impl ChunkIter {
    fn read_chunk(&mut self) -> Result<Snapshot> {
        let mut snapshot = Snapshot::empty();
        let mut row = csv::StringRecord::new();

        while snapshot.len() < self.chunk_size {
            let more = self
                .reader
                .read_record(&mut row)
                .map_err(|e| csv_error("load_new", &self.path, e))?;
            if !more {
                self.done = true;
                break;
            }
            let line = row.position().map(|p| p.line()).unwrap_or(0);
            let record = self.columns.parse_row(&row, line).map_err(|e| {
                SyncError::from(e)
                    .with_op("load_new")
                    .with_file_path(self.path.display().to_string())
            })?;
            snapshot.push(record);
        }

        Ok(snapshot)
    }
}

impl Iterator for ChunkIter {
    type Item = Result<Snapshot>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }

        let chunk = self.next_chunk;
        match self.read_chunk() {
            Ok(snapshot) if snapshot.is_empty() => None,
            Ok(snapshot) => {
                self.next_chunk += 1;
                tracing::debug!(chunk = chunk, rows = snapshot.len(), "read chunk");
                Some(Ok(snapshot))
            }
            Err(e) => {
                self.done = true;
                Some(Err(e.with_chunk(chunk)))
            }
        }
    }
}
