//! Record-only strategy: mark pending buckets as applied without running them.

use super::Strategy;
use crate::error::RunnerResult;
use crate::report::Outcome;
use fu_core::{Bucket, Ledger, RunStatus};

/// Mark every pending bucket as applied without running it.
#[derive(Debug, Clone, Copy, Default)]
pub struct RecordOnlyStrategy;

impl Strategy for RecordOnlyStrategy {
    fn proceed(&self, ledger: &dyn Ledger, buckets: Vec<Bucket>) -> RunnerResult<Outcome> {
        let mut recorded = Vec::with_capacity(buckets.len());
        for mut bucket in buckets {
            ledger.record_start(&mut bucket)?;
            ledger.record_end(&bucket, RunStatus::Skip)?;
            log::info!("Recorded {} as skipped", bucket.name());
            recorded.push(bucket.name().clone());
        }
        Ok(Outcome::Recorded(recorded))
    }
}
