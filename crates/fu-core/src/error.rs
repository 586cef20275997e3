//! Error types for fu-core

use thiserror::Error;

/// Core error type for Forgeup
#[derive(Error, Debug)]
pub enum CoreError {
    /// E001: Configuration file not found
    #[error("[E001] Config file not found: {path}")]
    ConfigNotFound { path: String },

    /// E002: Failed to parse configuration file
    #[error("[E002] Failed to parse config: {message}")]
    ConfigParseError { message: String },

    /// E003: Invalid configuration value
    #[error("[E003] Invalid config: {message}")]
    ConfigInvalid { message: String },

    /// E004: Project directory not found
    #[error("[E004] Project directory not found: {path}")]
    ProjectNotFound { path: String },

    /// E005: A configured bucket root is missing or unreadable
    #[error("[E005] Cannot discover buckets in {path}: {source}")]
    Discovery {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// E006: Invalid include/exclude pattern
    #[error("[E006] Invalid path pattern '{pattern}': {reason}")]
    InvalidPattern { pattern: String, reason: String },

    /// E007: Bucket file could not be read during resolution
    #[error("[E007] Failed to read bucket {path}: {source}")]
    BucketRead {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// E008: No bucket root configured
    #[error("[E008] No migration path configured")]
    NoMigrationPath,

    /// E009: IO error
    #[error("[E009] IO error: {0}")]
    Io(#[from] std::io::Error),

    /// E010: IO error with path context
    #[error("[E010] IO error at {path}: {source}")]
    IoWithPath {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

impl From<serde_yaml::Error> for CoreError {
    fn from(err: serde_yaml::Error) -> Self {
        CoreError::ConfigParseError {
            message: err.to_string(),
        }
    }
}

/// Result type alias for CoreError
pub type CoreResult<T> = Result<T, CoreError>;

/// Errors raised by a [`Ledger`](crate::ledger::Ledger) implementation.
#[derive(Error, Debug)]
pub enum LedgerError {
    /// L001: `record_end` found no open record for the bucket
    #[error("[L001] No open run record for bucket {script} (id {id:?})")]
    Inconsistent { script: String, id: Option<i64> },

    /// L002: The backing store rejected an operation
    #[error("[L002] Ledger storage failed during {operation}: {message}")]
    Storage { operation: String, message: String },

    /// L003: A persisted status code is outside the known range
    #[error("[L003] Unknown run status code {0}")]
    UnknownStatus(i16),

    /// L004: The ledger was opened for inspection and cannot be written
    #[error("[L004] Ledger is read-only; refusing to {operation}")]
    ReadOnly { operation: String },
}

/// Result type alias for LedgerError
pub type LedgerResult<T> = Result<T, LedgerError>;

/// What kind of problem a target service ran into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ServiceErrorKind {
    /// The backing system rejected the request
    #[default]
    Rejected,
    /// The request referenced a table, view or schema that does not exist
    MissingRelation,
    /// The service could not be reached or is no longer usable
    Unavailable,
}

/// Failure reported by a target-execution service.
///
/// Carries the message returned by the backing system so bucket logs can
/// surface it verbatim. Bucket bodies can branch on [`ServiceError::kind`],
/// e.g. to turn a missing relation into a precondition failure.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{service}: {message}")]
pub struct ServiceError {
    /// Name of the failing service (e.g. `duckdb`).
    pub service: String,
    pub kind: ServiceErrorKind,
    /// Message reported by the backing system.
    pub message: String,
}

impl ServiceError {
    /// Build a [`ServiceErrorKind::Rejected`] error.
    pub fn new(service: impl Into<String>, message: impl Into<String>) -> Self {
        Self::with_kind(service, ServiceErrorKind::Rejected, message)
    }

    pub fn with_kind(
        service: impl Into<String>,
        kind: ServiceErrorKind,
        message: impl Into<String>,
    ) -> Self {
        Self {
            service: service.into(),
            kind,
            message: message.into(),
        }
    }

    pub fn is_missing_relation(&self) -> bool {
        self.kind == ServiceErrorKind::MissingRelation
    }
}

/// Outcome of a bucket body that did not complete.
///
/// The split decides the recorded run status: [`BucketError::Failure`]
/// becomes FAILURE, [`BucketError::Error`] becomes ERROR.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BucketError {
    /// The bucket's own logic rejected the upgrade.
    #[error("upgrade not complete: {0}")]
    Failure(String),

    /// A backing service failed underneath the bucket.
    #[error("service error: {0}")]
    Error(String),
}

impl BucketError {
    /// Shorthand for a bucket-level rejection.
    pub fn failure(message: impl Into<String>) -> Self {
        BucketError::Failure(message.into())
    }

    /// The message without the classification prefix.
    pub fn message(&self) -> &str {
        match self {
            BucketError::Failure(m) | BucketError::Error(m) => m,
        }
    }
}

impl From<ServiceError> for BucketError {
    fn from(err: ServiceError) -> Self {
        BucketError::Error(err.to_string())
    }
}

/// Result type alias for BucketError
pub type BucketResult<T> = Result<T, BucketError>;
