//! Ledger database connection wrapper.
//!
//! [`LedgerDb`] owns a DuckDB [`Connection`]. Writable ledgers run the
//! schema migrations on open; inspected ledgers never touch the schema and
//! read as empty until some writable open has created it.

use crate::error::{LedgerDbError, LedgerDbResult};
use crate::migration::run_migrations;
use duckdb::Connection;
use std::path::Path;

/// Wrapper around the DuckDB connection that holds the ledger tables.
///
/// Single-threaded: runs are recorded one at a time.
pub struct LedgerDb {
    conn: Connection,
    writable: bool,
    schema_ready: bool,
}

impl LedgerDb {
    /// Open (or create) the ledger database at `path` and run pending migrations.
    pub fn open(path: &Path) -> LedgerDbResult<Self> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|e| {
                LedgerDbError::ConnectionError(format!("{e}: {}", parent.display()))
            })?;
        }
        let conn = Connection::open(path)
            .map_err(|e| LedgerDbError::ConnectionError(format!("{e}: {}", path.display())))?;
        Self::from_connection(conn)
    }

    /// Create an in-memory ledger with all migrations applied.
    ///
    /// Useful for unit tests that don't need persistence.
    pub fn open_memory() -> LedgerDbResult<Self> {
        let conn = Connection::open_in_memory()
            .map_err(|e| LedgerDbError::ConnectionError(e.to_string()))?;
        Self::from_connection(conn)
    }

    /// Wrap an existing connection, typically one cloned from the target
    /// database so the ledger lives next to the data it tracks.
    pub fn from_connection(conn: Connection) -> LedgerDbResult<Self> {
        run_migrations(&conn)?;
        Ok(Self {
            conn,
            writable: true,
            schema_ready: true,
        })
    }

    /// Wrap a connection for reading only. No DDL is issued; a database
    /// without the ledger tables reads as an empty history.
    pub fn inspect(conn: Connection) -> LedgerDbResult<Self> {
        let tables: i64 = conn
            .query_row(
                "SELECT COUNT(*) FROM information_schema.tables
                 WHERE table_schema = 'forgeup'
                   AND table_name IN ('bucket_runs', 'bucket_events')",
                [],
                |row| row.get(0),
            )
            .map_err(|e| LedgerDbError::ConnectionError(e.to_string()))?;
        Ok(Self {
            conn,
            writable: false,
            schema_ready: tables == 2,
        })
    }

    /// Open the ledger file at `path` read-only. A missing file is an empty
    /// history and is not created.
    pub fn inspect_path(path: &Path) -> LedgerDbResult<Self> {
        let conn = if path.exists() {
            let config = duckdb::Config::default()
                .access_mode(duckdb::AccessMode::ReadOnly)
                .map_err(|e| LedgerDbError::ConnectionError(e.to_string()))?;
            Connection::open_with_flags(path, config)
                .map_err(|e| LedgerDbError::ConnectionError(format!("{e}: {}", path.display())))?
        } else {
            log::debug!("No ledger at {}; history is empty", path.display());
            Connection::open_in_memory()
                .map_err(|e| LedgerDbError::ConnectionError(e.to_string()))?
        };
        Self::inspect(conn)
    }

    /// False for ledgers obtained through [`LedgerDb::inspect`].
    pub fn is_writable(&self) -> bool {
        self.writable
    }

    /// Whether the ledger tables exist in this database.
    pub fn has_schema(&self) -> bool {
        self.schema_ready
    }

    /// Borrow the underlying DuckDB connection.
    pub fn conn(&self) -> &Connection {
        &self.conn
    }
}

#[cfg(test)]
#[path = "connection_test.rs"]
mod tests;
