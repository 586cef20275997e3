//! Ledger record types: one [`RunRecord`] per execution attempt and the
//! [`SubEvent`] log lines attached to it.

use crate::bucket_name::BucketName;
use crate::status::{EventLevel, RunStatus};
use chrono::{Duration, NaiveDateTime};
use serde::{Deserialize, Serialize};

/// Surrogate id of a run record.
pub type RunId = i64;

/// One execution attempt of a bucket.
///
/// A record is either open (`end_date` and `status` both `None`) or
/// finalized (both `Some`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunRecord {
    pub id: RunId,
    /// Script identifier as recorded (the bucket path).
    pub script: String,
    pub start_date: NaiveDateTime,
    pub end_date: Option<NaiveDateTime>,
    pub status: Option<RunStatus>,
}

impl RunRecord {
    /// Whether the run was started but never finalized.
    pub fn is_open(&self) -> bool {
        self.end_date.is_none() && self.status.is_none()
    }

    /// Whether the run reached a final status.
    pub fn is_finalized(&self) -> bool {
        self.end_date.is_some() && self.status.is_some()
    }

    /// Basename of the recorded script, the key used for pending matching.
    pub fn bucket_name(&self) -> Option<BucketName> {
        BucketName::of_script(&self.script)
    }

    /// `end - start`, or `None` while the record is open.
    pub fn elapsed(&self) -> Option<Duration> {
        self.end_date.map(|end| end - self.start_date)
    }

    /// Status label, empty for open records.
    pub fn status_label(&self) -> &'static str {
        self.status.map_or("", RunStatus::label)
    }
}

/// Format a duration as `HH:MM:SS`, the way history reports show it.
pub fn format_elapsed(elapsed: Duration) -> String {
    let total = elapsed.num_seconds().max(0);
    format!(
        "{:02}:{:02}:{:02}",
        total / 3600,
        (total % 3600) / 60,
        total % 60
    )
}

/// Diagnostic log line attached to a run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubEvent {
    pub run_id: RunId,
    pub timestamp: NaiveDateTime,
    pub level: EventLevel,
    pub message: String,
}
