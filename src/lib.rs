//! ipdedup - count distinct IP addresses with a SQLite uniqueness constraint

pub mod config;
pub mod db;
pub mod error;
pub mod ingest;
pub mod report;
pub mod run;

// Re-export main counting API
pub use db::{InsertOutcome, IpStore};
pub use error::{Error, Result};
pub use ingest::{count_unique, count_unique_file};
pub use report::Report;
pub use run::run;
