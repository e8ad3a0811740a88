//! Database module for the IP uniqueness store.
//!
//! Uniqueness is enforced by SQLite itself: the `ips` table carries a
//! `UNIQUE` constraint and an insert that violates it is classified as a
//! duplicate from the structured error code, never from the message text.

use rusqlite::types::{ToSqlOutput, ValueRef};
use rusqlite::{ffi, Connection, ErrorCode, Result};
use std::path::Path;

/// Result of attempting to persist one value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InsertOutcome {
    /// The value was new and is now stored.
    Inserted,
    /// The value was already stored during this run.
    Duplicate,
}

/// Storage for the distinct values of a run.
///
/// Owns its connection exclusively; dropping the store closes it.
pub struct IpStore {
    conn: Connection,
}

impl IpStore {
    /// Opens or creates an IpStore at the given path.
    ///
    /// The schema is not touched; call [`IpStore::reset_schema`] before use.
    /// `":memory:"` opens a private in-memory database.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let conn = Connection::open(path)?;

        // WAL keeps per-row commits cheap for autocommit inserts
        conn.pragma_update(None, "journal_mode", "WAL")?;

        Ok(Self { conn })
    }

    /// Drops any existing `ips` table and creates it fresh.
    pub fn reset_schema(&self) -> Result<()> {
        self.conn.execute("DROP TABLE IF EXISTS ips", [])?;

        self.conn.execute(
            "CREATE TABLE IF NOT EXISTS ips (
                ip TEXT NOT NULL UNIQUE
            )",
            [],
        )?;

        Ok(())
    }

    /// Inserts a value, reporting whether it was new.
    ///
    /// The bytes are stored as TEXT without UTF-8 validation, so equality is
    /// byte-exact. A `UNIQUE` violation becomes [`InsertOutcome::Duplicate`].
    /// Every other failure, including other constraint kinds, is returned as
    /// an error.
    pub fn insert(&self, value: impl AsRef<[u8]>) -> Result<InsertOutcome> {
        let mut stmt = self.conn.prepare_cached("INSERT INTO ips (ip) VALUES (?1)")?;

        match stmt.execute([ToSqlOutput::Borrowed(ValueRef::Text(value.as_ref()))]) {
            Ok(_) => Ok(InsertOutcome::Inserted),
            Err(e) if is_unique_violation(&e) => Ok(InsertOutcome::Duplicate),
            Err(e) => Err(e),
        }
    }

    /// Returns the number of stored values.
    pub fn count(&self) -> Result<u64> {
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM ips", [], |row| row.get(0))?;
        Ok(count as u64)
    }

    /// Closes the connection, surfacing any error SQLite reports on close.
    pub fn close(self) -> Result<()> {
        self.conn.close().map_err(|(_, e)| e)
    }

    #[cfg(test)]
    pub(crate) fn connection(&self) -> &Connection {
        &self.conn
    }
}

/// True when the error is a violation of a `UNIQUE` (or primary key) constraint.
fn is_unique_violation(err: &rusqlite::Error) -> bool {
    match err {
        rusqlite::Error::SqliteFailure(e, _) => {
            e.code == ErrorCode::ConstraintViolation
                && matches!(
                    e.extended_code,
                    ffi::SQLITE_CONSTRAINT_UNIQUE | ffi::SQLITE_CONSTRAINT_PRIMARYKEY
                )
        }
        _ => false,
    }
}
