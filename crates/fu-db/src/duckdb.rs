//! DuckDB database backend implementation

use crate::error::{DbError, DbResult};
use duckdb::Connection;
use fu_core::{ServiceError, TargetService};
use std::path::Path;
use std::sync::{Mutex, MutexGuard};

const IN_MEMORY: &str = ":memory:";

/// DuckDB database backend
pub struct DuckDbBackend {
    conn: Mutex<Connection>,
}

impl DuckDbBackend {
    /// Create a new in-memory DuckDB connection
    pub fn in_memory() -> DbResult<Self> {
        let conn = Connection::open_in_memory().map_err(|e| DbError::open(IN_MEMORY, e))?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Create a new DuckDB connection from a file path
    pub fn from_path(path: &Path) -> DbResult<Self> {
        let conn = Connection::open(path)
            .map_err(|e| DbError::open(path.display().to_string(), e))?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Create from path string (handles :memory: special case)
    pub fn new(path: &str) -> DbResult<Self> {
        if path == IN_MEMORY {
            Self::in_memory()
        } else {
            Self::from_path(Path::new(path))
        }
    }

    fn lock(&self) -> DbResult<MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|_| DbError::Poisoned)
    }

    /// Open a second connection to the same database instance.
    ///
    /// Used to keep the ledger tables inside the target database.
    pub fn try_clone_connection(&self) -> DbResult<Connection> {
        let conn = self.lock()?;
        conn.try_clone()
            .map_err(|e| DbError::open("shared connection", e))
    }

    /// Execute one statement, returning affected rows
    pub fn execute(&self, sql: &str) -> DbResult<usize> {
        let conn = self.lock()?;
        conn.execute(sql, [])
            .map_err(|e| DbError::from(e).in_statement(sql))
    }

    /// Execute multiple statements
    pub fn execute_batch(&self, sql: &str) -> DbResult<()> {
        let conn = self.lock()?;
        conn.execute_batch(sql).map_err(DbError::from)
    }

    /// Count the rows a query returns
    pub fn query_count(&self, sql: &str) -> DbResult<usize> {
        let conn = self.lock()?;
        let count: i64 = conn
            .query_row(&format!("SELECT COUNT(*) FROM ({sql})"), [], |row| row.get(0))
            .map_err(DbError::from)?;
        Ok(usize::try_from(count).unwrap_or(0))
    }

    /// Check if a table or view exists; names may be schema-qualified
    pub fn relation_exists(&self, name: &str) -> DbResult<bool> {
        let (schema, table) = match name.rsplit_once('.') {
            Some((schema, table)) => (schema, table),
            None => ("main", name),
        };

        let conn = self.lock()?;
        let count: i64 = conn
            .query_row(
                "SELECT COUNT(*) FROM information_schema.tables WHERE table_schema = ? AND table_name = ?",
                duckdb::params![schema, table],
                |row| row.get(0),
            )
            .map_err(DbError::from)?;

        Ok(count > 0)
    }
}

fn service_error(err: DbError) -> ServiceError {
    ServiceError::with_kind("duckdb", err.kind(), err.to_string())
}

impl TargetService for DuckDbBackend {
    fn execute(&self, statement: &str) -> Result<usize, ServiceError> {
        log::debug!("duckdb execute: {statement}");
        DuckDbBackend::execute(self, statement).map_err(service_error)
    }

    fn execute_batch(&self, sql: &str) -> Result<(), ServiceError> {
        DuckDbBackend::execute_batch(self, sql).map_err(service_error)
    }

    fn query_count(&self, sql: &str) -> Result<usize, ServiceError> {
        DuckDbBackend::query_count(self, sql).map_err(service_error)
    }

    fn relation_exists(&self, name: &str) -> Result<bool, ServiceError> {
        DuckDbBackend::relation_exists(self, name).map_err(service_error)
    }

    fn service_type(&self) -> &'static str {
        "duckdb"
    }
}

#[cfg(test)]
#[path = "duckdb_test.rs"]
mod tests;
