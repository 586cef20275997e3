//! Error types for fu-runner

use fu_core::{CoreError, LedgerError, RunId};
use thiserror::Error;

/// Errors that stop a run before or while strategies execute.
///
/// Bucket failures are not errors here: they are recorded in the ledger and
/// reported through [`crate::ApplyReport`].
#[derive(Error, Debug)]
pub enum RunnerError {
    /// Discovery, resolution or configuration failure
    #[error(transparent)]
    Core(#[from] CoreError),

    /// The ledger rejected an operation
    #[error(transparent)]
    Ledger(#[from] LedgerError),

    /// R001: Pre-apply checks rejected the pending set
    #[error("[R001] {count} pre-apply check(s) failed: {details}")]
    PreApplyFailed { count: usize, details: String },

    /// R002: History requested for an unknown run id
    #[error("[R002] No run with id {0} in the ledger")]
    RunNotFound(RunId),
}

/// Result type alias for RunnerError
pub type RunnerResult<T> = Result<T, RunnerError>;
