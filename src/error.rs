//! Error types for a counting run.

use std::path::PathBuf;

/// Result type alias for ipdedup operations
pub type Result<T> = std::result::Result<T, Error>;

/// Fatal errors. Every variant stops the run; duplicates are not errors
/// and are reported as [`crate::db::InsertOutcome::Duplicate`] instead.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("failed to set up database: {0}")]
    StorageSetup(#[source] rusqlite::Error),

    #[error("failed to read {}: {source}", display_path(.path))]
    Read {
        path: Option<PathBuf>,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to insert IP {value:?}: {source}")]
    StorageWrite {
        value: String,
        #[source]
        source: rusqlite::Error,
    },

    #[error("failed to load configuration: {0}")]
    Config(#[from] config::ConfigError),
}

impl Error {
    /// Wraps an I/O error raised while reading `path`.
    pub fn read(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Error::Read {
            path: Some(path.into()),
            source,
        }
    }
}

fn display_path(path: &Option<PathBuf>) -> String {
    match path {
        Some(p) => p.display().to_string(),
        None => "input".to_string(),
    }
}
