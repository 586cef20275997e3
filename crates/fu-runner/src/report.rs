//! Strategy outcomes and the report rows built from them.

use chrono::NaiveDateTime;
use fu_core::{format_elapsed, BucketName, RunId, RunRecord, RunStatus, SubEvent};
use serde::Serialize;
use std::path::PathBuf;

/// What a strategy did with the pending set.
#[derive(Debug)]
pub enum Outcome {
    /// Nothing was pending
    UpToDate,
    Applied(ApplyReport),
    /// Buckets marked as skipped without running
    Recorded(Vec<BucketName>),
    Checked(CheckReport),
    History(HistoryReport),
}

/// Result of running one bucket.
#[derive(Debug, Clone, Serialize)]
pub struct BucketRunResult {
    pub bucket: BucketName,
    pub run_id: RunId,
    pub status: RunStatus,
    pub duration_secs: f64,
    pub error: Option<String>,
}

/// Results of an apply pass, in execution order.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ApplyReport {
    pub results: Vec<BucketRunResult>,
    /// Buckets left pending because an earlier one did not succeed.
    pub not_attempted: Vec<BucketName>,
}

impl ApplyReport {
    pub fn success_count(&self) -> usize {
        self.results
            .iter()
            .filter(|r| r.status == RunStatus::Success)
            .count()
    }

    pub fn failure_count(&self) -> usize {
        self.results.len() - self.success_count()
    }

    /// Whether every pending bucket applied.
    pub fn is_success(&self) -> bool {
        self.failure_count() == 0 && self.not_attempted.is_empty()
    }

    /// The run that halted the pass, if any.
    pub fn first_failure(&self) -> Option<&BucketRunResult> {
        self.results
            .iter()
            .find(|r| r.status != RunStatus::Success)
    }
}

/// One pending bucket in a check preview.
#[derive(Debug, Clone, Serialize)]
pub struct CheckEntry {
    pub name: BucketName,
    pub path: PathBuf,
    pub description: String,
}

/// Read-only preview of what an apply would do.
#[derive(Debug, Clone, Default, Serialize)]
pub struct CheckReport {
    pub entries: Vec<CheckEntry>,
}

impl CheckReport {
    pub fn pending_count(&self) -> usize {
        self.entries.len()
    }
}

/// A ledger record as shown in history reports.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HistoryEntry {
    pub id: RunId,
    pub script: String,
    pub start_date: NaiveDateTime,
    /// `HH:MM:SS`, empty while the run is open
    pub execution: String,
    /// Status label, empty while the run is open
    pub status: String,
}

impl From<&RunRecord> for HistoryEntry {
    fn from(record: &RunRecord) -> Self {
        Self {
            id: record.id,
            script: record.script.clone(),
            start_date: record.start_date,
            execution: record.elapsed().map(format_elapsed).unwrap_or_default(),
            status: record.status_label().to_string(),
        }
    }
}

/// Ledger history, either complete or for a single run.
#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum HistoryReport {
    All(Vec<HistoryEntry>),
    Run {
        run: HistoryEntry,
        events: Vec<SubEvent>,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn record(status: Option<RunStatus>) -> RunRecord {
        let start = NaiveDate::from_ymd_opt(2020, 1, 1)
            .unwrap()
            .and_hms_opt(10, 0, 0)
            .unwrap();
        RunRecord {
            id: 3,
            script: "/srv/migrations/20200101_init".to_string(),
            start_date: start,
            end_date: status.map(|_| start + chrono::Duration::seconds(75)),
            status,
        }
    }

    #[test]
    fn test_history_entry_finalized() {
        let entry = HistoryEntry::from(&record(Some(RunStatus::Skip)));
        assert_eq!(entry.execution, "00:01:15");
        assert_eq!(entry.status, "skipped");
    }

    #[test]
    fn test_history_entry_open_has_blank_columns() {
        let entry = HistoryEntry::from(&record(None));
        assert_eq!(entry.execution, "");
        assert_eq!(entry.status, "");
    }

    #[test]
    fn test_apply_report_counts() {
        let result = |status| BucketRunResult {
            bucket: BucketName::try_new("a").unwrap(),
            run_id: 1,
            status,
            duration_secs: 0.0,
            error: None,
        };
        let report = ApplyReport {
            results: vec![result(RunStatus::Success), result(RunStatus::Failure)],
            not_attempted: vec![BucketName::try_new("c").unwrap()],
        };
        assert_eq!(report.success_count(), 1);
        assert_eq!(report.failure_count(), 1);
        assert!(!report.is_success());
        assert_eq!(report.first_failure().unwrap().status, RunStatus::Failure);
        assert!(ApplyReport::default().is_success());
    }
}
