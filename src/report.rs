//! Run report: unique count plus memory and time used.

use std::fmt;
use std::time::Duration;

use sysinfo::System;

const BYTES_PER_MB: f64 = 1024.0 * 1024.0;

/// Outcome of a successful run, printed as three lines.
#[derive(Debug, Clone, PartialEq)]
pub struct Report {
    pub unique_count: u64,
    /// Resident memory of the process when the run finished
    pub memory_bytes: u64,
    /// Wall-clock time for store setup and ingestion
    pub elapsed: Duration,
}

impl Report {
    pub fn new(unique_count: u64, memory_bytes: u64, elapsed: Duration) -> Self {
        Self {
            unique_count,
            memory_bytes,
            elapsed,
        }
    }

    pub fn memory_mb(&self) -> f64 {
        self.memory_bytes as f64 / BYTES_PER_MB
    }

    pub fn elapsed_ms(&self) -> f64 {
        self.elapsed.as_nanos() as f64 / 1_000_000.0
    }
}

impl fmt::Display for Report {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Number of unique IPs: {}", self.unique_count)?;
        writeln!(f, "Memory used: {:.2} MB", self.memory_mb())?;
        write!(f, "Time taken: {:.3} ms", self.elapsed_ms())
    }
}

/// Returns the resident memory of the current process in bytes.
///
/// Falls back to 0 if the process cannot be inspected; the value is only
/// ever displayed.
pub fn current_memory_bytes() -> u64 {
    let pid = match sysinfo::get_current_pid() {
        Ok(pid) => pid,
        Err(e) => {
            tracing::warn!("could not determine current pid: {}", e);
            return 0;
        }
    };

    let mut sys = System::new();
    if !sys.refresh_process(pid) {
        tracing::warn!("could not read memory usage for pid {}", pid);
        return 0;
    }

    sys.process(pid).map(|p| p.memory()).unwrap_or(0)
}
