//! Check strategy: list what would run without touching anything.

use super::Strategy;
use crate::error::RunnerResult;
use crate::report::{CheckEntry, CheckReport, Outcome};
use fu_core::{Bucket, Ledger};

/// Preview the pending set. Never writes to the ledger.
#[derive(Debug, Clone, Copy, Default)]
pub struct CheckStrategy;

impl Strategy for CheckStrategy {
    fn proceed(&self, _ledger: &dyn Ledger, buckets: Vec<Bucket>) -> RunnerResult<Outcome> {
        let entries: Vec<CheckEntry> = buckets
            .iter()
            .map(|bucket| CheckEntry {
                name: bucket.name().clone(),
                path: bucket.path().to_path_buf(),
                description: bucket.description(),
            })
            .collect();
        log::info!("{} migrations pending", entries.len());
        Ok(Outcome::Checked(CheckReport { entries }))
    }
}
