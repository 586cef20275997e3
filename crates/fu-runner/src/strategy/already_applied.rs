//! History strategy: report runs the ledger already holds.

use super::Strategy;
use crate::error::{RunnerError, RunnerResult};
use crate::report::{HistoryEntry, HistoryReport, Outcome};
use fu_core::{Bucket, Ledger, RunId};

/// Report what the ledger already holds. Ignores discovery entirely.
#[derive(Debug, Clone, Copy, Default)]
pub struct AlreadyAppliedStrategy {
    run: Option<RunId>,
}

impl AlreadyAppliedStrategy {
    /// Full history when `run` is `None`, otherwise one run with its events.
    pub fn new(run: Option<RunId>) -> Self {
        Self { run }
    }

    pub fn report(&self, ledger: &dyn Ledger) -> RunnerResult<HistoryReport> {
        let Some(id) = self.run else {
            let records = ledger.query_by_status(&[])?;
            return Ok(HistoryReport::All(
                records.iter().map(HistoryEntry::from).collect(),
            ));
        };

        let record = ledger.summarize(id)?.ok_or(RunnerError::RunNotFound(id))?;
        let events = ledger.detailed_log(id)?;
        Ok(HistoryReport::Run {
            run: HistoryEntry::from(&record),
            events,
        })
    }
}

impl Strategy for AlreadyAppliedStrategy {
    fn proceed(&self, ledger: &dyn Ledger, _buckets: Vec<Bucket>) -> RunnerResult<Outcome> {
        self.report(ledger).map(Outcome::History)
    }
}
