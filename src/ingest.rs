//! Line ingestion: stream a source into the store and count new values.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use crate::db::{InsertOutcome, IpStore};
use crate::error::{Error, Result};

/// Default number of lines between progress events.
pub const DEFAULT_PROGRESS_INTERVAL: u64 = 1_000_000;

/// Inserts every line of `reader` into `store` and returns how many were new.
///
/// Lines are raw bytes: `\n` ends a line, one `\r` before it (or at the end
/// of the last line) is dropped, and nothing else is trimmed or validated.
/// Duplicates are skipped. The first read failure or non-duplicate insert
/// failure aborts the whole call.
pub fn count_unique<R: BufRead>(store: &IpStore, reader: R) -> Result<u64> {
    count_unique_with_progress(store, reader, DEFAULT_PROGRESS_INTERVAL)
}

/// Like [`count_unique`], emitting a debug event every `progress_interval`
/// lines. An interval of 0 disables progress events.
pub fn count_unique_with_progress<R: BufRead>(
    store: &IpStore,
    reader: R,
    progress_interval: u64,
) -> Result<u64> {
    let mut lines_read: u64 = 0;
    let mut unique: u64 = 0;

    for line in reader.split(b'\n') {
        let line = line.map_err(|source| Error::Read { path: None, source })?;
        let ip = strip_cr(&line);
        lines_read += 1;

        match store.insert(ip) {
            Ok(InsertOutcome::Inserted) => unique += 1,
            Ok(InsertOutcome::Duplicate) => {}
            Err(source) => {
                return Err(Error::StorageWrite {
                    value: String::from_utf8_lossy(ip).into_owned(),
                    source,
                })
            }
        }

        if progress_interval > 0 && lines_read % progress_interval == 0 {
            tracing::debug!("Processed {} lines, {} unique", lines_read, unique);
        }
    }

    tracing::info!(
        "Ingested {} lines: {} unique, {} duplicate",
        lines_read,
        unique,
        lines_read - unique
    );

    Ok(unique)
}

fn strip_cr(line: &[u8]) -> &[u8] {
    line.strip_suffix(b"\r").unwrap_or(line)
}

/// Opens `path` and counts its unique lines into `store`.
///
/// Read failures carry the path for diagnosis.
pub fn count_unique_file<P: AsRef<Path>>(
    store: &IpStore,
    path: P,
    progress_interval: u64,
) -> Result<u64> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|e| Error::read(path, e))?;

    count_unique_with_progress(store, BufReader::new(file), progress_interval).map_err(|e| match e {
        Error::Read { path: None, source } => Error::read(path, source),
        other => other,
    })
}
