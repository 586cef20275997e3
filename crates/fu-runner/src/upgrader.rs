//! The upgrade orchestrator: discover, resolve, compute pending, then hand
//! the pending set to a strategy.

use crate::error::RunnerResult;
use crate::report::{HistoryReport, Outcome};
use crate::strategy::{AlreadyAppliedStrategy, Strategy};
use fu_core::{pending_buckets, Bucket, BucketFactory, BucketLocator, CoreError, Ledger, RunId};

/// Ties discovery, resolution and the ledger together for one project.
pub struct Upgrader<L> {
    locator: BucketLocator,
    factory: BucketFactory,
    ledger: L,
}

impl<L: Ledger> Upgrader<L> {
    pub fn new(locator: BucketLocator, factory: BucketFactory, ledger: L) -> Self {
        Self {
            locator,
            factory,
            ledger,
        }
    }

    pub fn ledger(&self) -> &L {
        &self.ledger
    }

    /// Buckets that still need to run, in basename order.
    pub fn pending(&self) -> RunnerResult<Vec<Bucket>> {
        if self.locator.roots().is_empty() {
            return Err(CoreError::NoMigrationPath.into());
        }

        let candidates = self.locator.locate()?;
        log::debug!("Discovered {} candidate file(s)", candidates.len());
        let buckets = self.factory.resolve_all(&candidates)?;
        let pending = pending_buckets(buckets, &self.ledger)?;
        log::debug!("{} bucket(s) pending", pending.len());
        Ok(pending)
    }

    /// Run `strategy` over the pending set.
    pub fn run_pending(&self, strategy: &dyn Strategy) -> RunnerResult<Outcome> {
        let pending = self.pending()?;
        if pending.is_empty() {
            log::info!("System up-to-date");
            return Ok(Outcome::UpToDate);
        }
        strategy.proceed(&self.ledger, pending)
    }

    /// Ledger history, complete or for one run.
    pub fn show_history(&self, run: Option<RunId>) -> RunnerResult<HistoryReport> {
        AlreadyAppliedStrategy::new(run).report(&self.ledger)
    }
}

#[cfg(test)]
#[path = "upgrader_test.rs"]
mod tests;
