//! A complete counting run: reset the store, ingest the input, report.

use std::fmt;
use std::time::Instant;

use crate::config::Config;
use crate::db::IpStore;
use crate::error::{Error, Result};
use crate::ingest::count_unique_file;
use crate::report::{current_memory_bytes, Report};

/// States a run moves through. `Done` and `Failed` are terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunPhase {
    Init,
    SchemaReady,
    Ingesting,
    Done,
    Failed,
}

impl fmt::Display for RunPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            RunPhase::Init => "init",
            RunPhase::SchemaReady => "schema-ready",
            RunPhase::Ingesting => "ingesting",
            RunPhase::Done => "done",
            RunPhase::Failed => "failed",
        };
        f.write_str(name)
    }
}

/// Runs the pipeline described by `config` and returns the report.
///
/// The store and input file are owned by this call and released on every
/// return path. On error no report is produced.
pub fn run(config: &Config) -> Result<Report> {
    let start = Instant::now();
    tracing::debug!("Run phase: {}", RunPhase::Init);

    let store = match open_fresh_store(config) {
        Ok(store) => store,
        Err(e) => {
            tracing::debug!("Run phase: {} (from {}): {}", RunPhase::Failed, RunPhase::Init, e);
            return Err(e);
        }
    };

    run_with_store(store, config, start)
}

/// Ingests `config.input_path` into an already reset store and reports.
///
/// `start` is when the run began, so setup time counts toward the report.
/// The store is closed on success and dropped on error.
pub fn run_with_store(store: IpStore, config: &Config, start: Instant) -> Result<Report> {
    tracing::debug!("Run phase: {}", RunPhase::SchemaReady);

    tracing::debug!("Run phase: {}", RunPhase::Ingesting);
    tracing::info!("Reading {}", config.input_path.display());
    let unique = match count_unique_file(&store, &config.input_path, config.progress_interval) {
        Ok(unique) => unique,
        Err(e) => {
            tracing::debug!("Run phase: {} (from {}): {}", RunPhase::Failed, RunPhase::Ingesting, e);
            return Err(e);
        }
    };

    match store.count() {
        Ok(stored) if stored != unique => {
            tracing::warn!("Store holds {} rows but {} were counted", stored, unique)
        }
        Ok(_) => {}
        Err(e) => tracing::warn!("Could not count stored rows: {}", e),
    }

    if let Err(e) = store.close() {
        tracing::warn!("Error closing database connection: {}", e);
    }

    tracing::debug!("Run phase: {}", RunPhase::Done);
    Ok(Report::new(unique, current_memory_bytes(), start.elapsed()))
}

/// Opens the configured database and resets its schema.
///
/// Any failure is a [`Error::StorageSetup`].
pub fn open_fresh_store(config: &Config) -> Result<IpStore> {
    tracing::info!("Database: {}", config.database_path.display());
    let store = IpStore::open(&config.database_path).map_err(Error::StorageSetup)?;
    store.reset_schema().map_err(Error::StorageSetup)?;
    Ok(store)
}
