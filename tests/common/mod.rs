//! Shared test utilities and helpers for ipdedup tests.

use std::path::PathBuf;

use ipdedup::config::Config;
use tempfile::TempDir;

/// Creates a temporary directory for test data.
///
/// The directory is automatically cleaned up when the `TempDir` is dropped.
pub fn create_temp_dir() -> TempDir {
    tempfile::tempdir().expect("Failed to create temporary directory")
}

/// A scratch input file and database path inside a temporary directory.
pub struct TestRun {
    pub dir: TempDir,
    pub input_path: PathBuf,
    pub database_path: PathBuf,
}

impl TestRun {
    /// Writes `lines` joined by `\n` (with a trailing terminator) as the input.
    pub fn with_lines(lines: &[&str]) -> Self {
        let mut content = lines.join("\n");
        if !lines.is_empty() {
            content.push('\n');
        }
        Self::with_content(&content)
    }

    /// Writes `content` verbatim as the input.
    pub fn with_content(content: &str) -> Self {
        let dir = create_temp_dir();
        let input_path = dir.path().join("ip_addresses.txt");
        let database_path = dir.path().join("ip_addresses.db");
        std::fs::write(&input_path, content).expect("Failed to write input file");

        Self {
            dir,
            input_path,
            database_path,
        }
    }

    pub fn config(&self) -> Config {
        Config::new(&self.input_path, &self.database_path)
    }
}
