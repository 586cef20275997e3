//! Error types for the ledger store.

use fu_core::LedgerError;
use thiserror::Error;

/// Errors opening or migrating the ledger database.
#[derive(Error, Debug)]
pub enum LedgerDbError {
    /// Failed to open or create the ledger database (S001).
    #[error("[S001] Ledger database connection failed: {0}")]
    ConnectionError(String),

    /// Ledger schema migration failed (S002).
    #[error("[S002] Ledger schema migration failed: {0}")]
    MigrationError(String),
}

/// Result type alias for [`LedgerDbError`].
pub type LedgerDbResult<T> = Result<T, LedgerDbError>;

/// Attach the failing operation to a DuckDB error.
pub(crate) trait StorageContext<T> {
    fn storage_context(self, operation: &str) -> Result<T, LedgerError>;
}

impl<T> StorageContext<T> for Result<T, duckdb::Error> {
    fn storage_context(self, operation: &str) -> Result<T, LedgerError> {
        self.map_err(|e| LedgerError::Storage {
            operation: operation.to_string(),
            message: e.to_string(),
        })
    }
}
