//! Error types for fu-db

use fu_core::ServiceErrorKind;
use thiserror::Error;

/// Failures of the DuckDB target backend.
#[derive(Error, Debug)]
pub enum DbError {
    /// D001: The database file or a second connection could not be opened
    #[error("[D001] Cannot open {target}: {message}")]
    Open { target: String, message: String },

    /// D002: DuckDB refused a statement
    #[error("[D002] Statement rejected: {message}")]
    Rejected { message: String },

    /// D003: A statement named a table, view or schema that does not exist
    #[error("[D003] Unknown relation: {message}")]
    UnknownRelation { message: String },

    /// D004: A previous holder of the connection lock panicked
    #[error("[D004] Connection lock poisoned")]
    Poisoned,
}

/// Result type alias for DbError
pub type DbResult<T> = Result<T, DbError>;

impl DbError {
    pub(crate) fn open(target: impl Into<String>, err: duckdb::Error) -> Self {
        DbError::Open {
            target: target.into(),
            message: err.to_string(),
        }
    }

    /// Suffix the failing statement onto a rejection message.
    pub(crate) fn in_statement(self, sql: &str) -> Self {
        match self {
            DbError::Rejected { message } => DbError::Rejected {
                message: format!("{message}: {sql}"),
            },
            DbError::UnknownRelation { message } => DbError::UnknownRelation {
                message: format!("{message}: {sql}"),
            },
            other => other,
        }
    }

    /// Category reported to buckets through [`fu_core::ServiceError`].
    pub fn kind(&self) -> ServiceErrorKind {
        match self {
            DbError::Rejected { .. } => ServiceErrorKind::Rejected,
            DbError::UnknownRelation { .. } => ServiceErrorKind::MissingRelation,
            DbError::Open { .. } | DbError::Poisoned => ServiceErrorKind::Unavailable,
        }
    }
}

impl From<duckdb::Error> for DbError {
    fn from(err: duckdb::Error) -> Self {
        // catalog misses only surface in the message text
        let message = err.to_string();
        if message.contains("Catalog Error") && message.contains("does not exist") {
            DbError::UnknownRelation { message }
        } else {
            DbError::Rejected { message }
        }
    }
}
