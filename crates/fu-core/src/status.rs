//! Run status and event severity enums shared by the ledger and the runner.

use crate::error::{LedgerError, LedgerResult};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Final status of a bucket run.
///
/// The discriminants are the persisted codes in `bucket_runs.status`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RunStatus {
    /// A backing service failed while the bucket ran
    Error = 0,
    /// The bucket applied cleanly
    Success = 1,
    /// The bucket's own logic rejected the upgrade
    Failure = 2,
    /// Recorded without executing (record-only)
    Skip = 3,
}

impl RunStatus {
    /// Statuses that permanently remove a bucket from the pending set.
    pub const TERMINAL: [RunStatus; 2] = [RunStatus::Success, RunStatus::Skip];

    /// Persisted integer code.
    pub fn code(self) -> i16 {
        self as i16
    }

    /// Decode a persisted integer code.
    pub fn from_code(code: i16) -> LedgerResult<Self> {
        match code {
            0 => Ok(RunStatus::Error),
            1 => Ok(RunStatus::Success),
            2 => Ok(RunStatus::Failure),
            3 => Ok(RunStatus::Skip),
            other => Err(LedgerError::UnknownStatus(other)),
        }
    }

    /// Human-readable label used in history reports.
    pub fn label(self) -> &'static str {
        match self {
            RunStatus::Error => "error",
            RunStatus::Success => "success",
            RunStatus::Failure => "failure",
            RunStatus::Skip => "skipped",
        }
    }

    /// Whether this status removes the bucket from future pending sets.
    pub fn is_terminal(self) -> bool {
        Self::TERMINAL.contains(&self)
    }
}

impl fmt::Display for RunStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Severity of a run sub-event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum EventLevel {
    Debug,
    Info,
    Warn,
    Error,
}

impl EventLevel {
    pub fn as_str(self) -> &'static str {
        match self {
            EventLevel::Debug => "DEBUG",
            EventLevel::Info => "INFO",
            EventLevel::Warn => "WARN",
            EventLevel::Error => "ERROR",
        }
    }

    /// Parse a stored level; unknown strings fall back to `Info`.
    pub fn parse(s: &str) -> Self {
        match s.to_ascii_uppercase().as_str() {
            "DEBUG" => EventLevel::Debug,
            "WARN" | "WARNING" => EventLevel::Warn,
            "ERROR" | "FATAL" => EventLevel::Error,
            _ => EventLevel::Info,
        }
    }

    /// Matching `log` crate level.
    pub fn log_level(self) -> log::Level {
        match self {
            EventLevel::Debug => log::Level::Debug,
            EventLevel::Info => log::Level::Info,
            EventLevel::Warn => log::Level::Warn,
            EventLevel::Error => log::Level::Error,
        }
    }
}

impl fmt::Display for EventLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes_are_stable() {
        assert_eq!(RunStatus::Error.code(), 0);
        assert_eq!(RunStatus::Success.code(), 1);
        assert_eq!(RunStatus::Failure.code(), 2);
        assert_eq!(RunStatus::Skip.code(), 3);
    }

    #[test]
    fn test_from_code() {
        for status in [
            RunStatus::Error,
            RunStatus::Success,
            RunStatus::Failure,
            RunStatus::Skip,
        ] {
            assert_eq!(RunStatus::from_code(status.code()).unwrap(), status);
        }
        assert!(matches!(
            RunStatus::from_code(9),
            Err(LedgerError::UnknownStatus(9))
        ));
    }

    #[test]
    fn test_terminal_statuses() {
        assert!(RunStatus::Success.is_terminal());
        assert!(RunStatus::Skip.is_terminal());
        assert!(!RunStatus::Failure.is_terminal());
        assert!(!RunStatus::Error.is_terminal());
    }

    #[test]
    fn test_labels() {
        assert_eq!(RunStatus::Skip.to_string(), "skipped");
        assert_eq!(RunStatus::Failure.label(), "failure");
    }

    #[test]
    fn test_event_level_parse() {
        assert_eq!(EventLevel::parse("warn"), EventLevel::Warn);
        assert_eq!(EventLevel::parse("FATAL"), EventLevel::Error);
        assert_eq!(EventLevel::parse("whatever"), EventLevel::Info);
        assert_eq!(EventLevel::parse(EventLevel::Debug.as_str()), EventLevel::Debug);
    }
}
