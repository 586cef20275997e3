//! The ledger contract: persisted run history used to compute pending
//! buckets and to report what already ran.

use crate::bucket::{Bucket, BucketEvent};
use crate::error::LedgerResult;
use crate::record::{RunId, RunRecord, SubEvent};
use crate::status::RunStatus;

/// Persisted run history.
///
/// Implementations own every [`RunRecord`] and [`SubEvent`]. Access is
/// sequential; nothing here is expected to be called concurrently.
pub trait Ledger {
    /// Open a run for `bucket` (start = now), store the generated id on the
    /// bucket and return it.
    fn record_start(&self, bucket: &mut Bucket) -> LedgerResult<RunId>;

    /// Finalize the open run of `bucket` (end = now).
    ///
    /// Fails with [`LedgerError::Inconsistent`](crate::error::LedgerError::Inconsistent)
    /// when the bucket has no id or its run is not open.
    fn record_end(&self, bucket: &Bucket, status: RunStatus) -> LedgerResult<()>;

    /// Records whose status is in `statuses`, oldest start first. An empty
    /// slice returns every record, open ones included.
    fn query_by_status(&self, statuses: &[RunStatus]) -> LedgerResult<Vec<RunRecord>>;

    /// One record by id.
    fn summarize(&self, id: RunId) -> LedgerResult<Option<RunRecord>>;

    /// Events attached to a run, in timestamp order.
    fn detailed_log(&self, id: RunId) -> LedgerResult<Vec<SubEvent>>;

    /// Attach an event to a run, keeping the time it was logged.
    fn append_event(&self, id: RunId, event: &BucketEvent) -> LedgerResult<()>;
}
