//! Pending-set computation.

use crate::bucket::Bucket;
use crate::bucket_name::BucketName;
use crate::error::LedgerResult;
use crate::ledger::Ledger;
use crate::record::RunRecord;
use crate::status::RunStatus;
use std::collections::HashSet;

/// Basenames with a finalized terminal (SUCCESS or SKIP) record.
pub fn applied_names(records: &[RunRecord]) -> HashSet<BucketName> {
    records
        .iter()
        .filter(|r| r.is_finalized() && r.status.is_some_and(RunStatus::is_terminal))
        .filter_map(RunRecord::bucket_name)
        .collect()
}

/// Drop buckets that already have a terminal record, keeping order.
pub fn remove_applied(buckets: Vec<Bucket>, records: &[RunRecord]) -> Vec<Bucket> {
    let applied = applied_names(records);
    buckets
        .into_iter()
        .filter(|b| {
            let done = applied.contains(b.name());
            if done {
                log::debug!("Remove (already applied): {}", b.name());
            }
            !done
        })
        .collect()
}

/// Buckets from `buckets` that still need to run according to `ledger`.
pub fn pending_buckets(buckets: Vec<Bucket>, ledger: &dyn Ledger) -> LedgerResult<Vec<Bucket>> {
    let records = ledger.query_by_status(&RunStatus::TERMINAL)?;
    Ok(remove_applied(buckets, &records))
}

#[cfg(test)]
#[path = "pending_test.rs"]
mod tests;
