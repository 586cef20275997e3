//! Ledger DDL versioning.
//!
//! `forgeup.schema_version` holds one row per applied DDL file. Opening a
//! ledger applies every newer file, each in its own transaction together
//! with its bookkeeping row.

use crate::ddl::{Migration, MIGRATIONS};
use crate::error::{LedgerDbError, LedgerDbResult};
use duckdb::Connection;

const VERSION_TABLE: &str = "CREATE SCHEMA IF NOT EXISTS forgeup;
CREATE TABLE IF NOT EXISTS forgeup.schema_version (
    version    INTEGER NOT NULL,
    applied_at TIMESTAMP NOT NULL DEFAULT now()
);";

fn migration_error(context: &str, err: duckdb::Error) -> LedgerDbError {
    LedgerDbError::MigrationError(format!("{context}: {err}"))
}

/// Highest applied ledger DDL version, 0 for a fresh database.
pub fn current_version(conn: &Connection) -> LedgerDbResult<i32> {
    conn.query_row(
        "SELECT COALESCE(MAX(version), 0) FROM forgeup.schema_version",
        [],
        |row| row.get(0),
    )
    .map_err(|e| migration_error("reading schema version", e))
}

fn apply_one(conn: &Connection, migration: &Migration) -> LedgerDbResult<()> {
    let label = format!("v{:03}", migration.version);
    log::debug!("Applying ledger DDL {label}");

    conn.execute_batch("BEGIN TRANSACTION")
        .map_err(|e| migration_error(&format!("{label} BEGIN"), e))?;

    let applied = conn.execute_batch(migration.sql).and_then(|()| {
        conn.execute(
            "INSERT INTO forgeup.schema_version (version) VALUES (?)",
            duckdb::params![migration.version],
        )
    });

    match applied {
        Ok(_) => conn
            .execute_batch("COMMIT")
            .map_err(|e| migration_error(&format!("{label} COMMIT"), e)),
        Err(e) => {
            if let Err(rollback) = conn.execute_batch("ROLLBACK") {
                log::warn!("Rollback of ledger DDL {label} failed: {rollback}");
            }
            Err(migration_error(&label, e))
        }
    }
}

/// Bring the ledger schema up to the latest DDL version.
pub fn run_migrations(conn: &Connection) -> LedgerDbResult<()> {
    conn.execute_batch(VERSION_TABLE)
        .map_err(|e| migration_error("creating schema_version", e))?;

    let current = current_version(conn)?;
    MIGRATIONS
        .iter()
        .filter(|m| m.version > current)
        .try_for_each(|m| apply_one(conn, m))
}
