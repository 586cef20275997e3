//! Apply strategy: run pending buckets in order and record each outcome.

use super::Strategy;
use crate::error::{RunnerError, RunnerResult};
use crate::report::{ApplyReport, BucketRunResult, Outcome};
use fu_core::{
    Bucket, BucketError, BucketEvent, BucketResult, EventLevel, Ledger, RunId, RunStatus,
};
use std::panic::{self, AssertUnwindSafe};
use std::time::Instant;

/// Options for [`ApplyStrategy`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ApplyOptions {
    /// Skip the pre-apply phase entirely.
    pub ignore_pre_apply: bool,
    /// Log failing pre-apply checks and continue.
    pub force: bool,
}

/// Run each pending bucket in order and record the outcome.
///
/// Stops after the first bucket that does not succeed; the remaining ones
/// stay pending for the next run.
#[derive(Debug, Clone, Copy, Default)]
pub struct ApplyStrategy {
    options: ApplyOptions,
}

impl ApplyStrategy {
    pub fn new(options: ApplyOptions) -> Self {
        Self { options }
    }

    fn check_pre_apply(&self, buckets: &[Bucket]) -> RunnerResult<()> {
        if self.options.ignore_pre_apply {
            log::debug!("Pre-apply checks ignored");
            return Ok(());
        }

        let mut failures = Vec::new();
        for bucket in buckets {
            let ctx = bucket.context();
            if let Err(e) = guarded(|| bucket.migration().pre_apply(&ctx)) {
                log::warn!("Pre-apply check failed for {}: {e}", bucket.name());
                failures.push(format!("{}: {}", bucket.name(), e.message()));
            }
        }

        if failures.is_empty() {
            return Ok(());
        }
        if self.options.force {
            log::warn!(
                "Continuing despite {} failed pre-apply check(s) (forced)",
                failures.len()
            );
            return Ok(());
        }
        Err(RunnerError::PreApplyFailed {
            count: failures.len(),
            details: failures.join("; "),
        })
    }

    fn run_bucket(&self, ledger: &dyn Ledger, bucket: &mut Bucket) -> RunnerResult<BucketRunResult> {
        log::info!("Processing {}", bucket.name());
        let started = Instant::now();
        let id = ledger.record_start(bucket)?;

        let ctx = bucket.context();
        let result = guarded(|| {
            bucket.migration().apply(&ctx)?;
            bucket.migration().post_apply(&ctx)
        });
        let status = match &result {
            Ok(()) => RunStatus::Success,
            Err(BucketError::Failure(_)) => RunStatus::Failure,
            Err(BucketError::Error(_)) => RunStatus::Error,
        };

        let error = result.err().map(|e| e.to_string());
        let mut events = ctx.take_events();
        if let Some(message) = &error {
            events.push(BucketEvent::now(EventLevel::Error, message.clone()));
        }
        flush_events(ledger, id, &events);
        ledger.record_end(bucket, status)?;

        match &error {
            None => log::info!("OK: {}", bucket.name()),
            Some(message) => log::error!("{} {}: {message}", status.label(), bucket.name()),
        }

        Ok(BucketRunResult {
            bucket: bucket.name().clone(),
            run_id: id,
            status,
            duration_secs: started.elapsed().as_secs_f64(),
            error,
        })
    }
}

impl Strategy for ApplyStrategy {
    fn proceed(&self, ledger: &dyn Ledger, buckets: Vec<Bucket>) -> RunnerResult<Outcome> {
        self.check_pre_apply(&buckets)?;

        let mut report = ApplyReport::default();
        let mut remaining = buckets.into_iter();
        while let Some(mut bucket) = remaining.next() {
            let result = self.run_bucket(ledger, &mut bucket)?;
            let halted = result.status != RunStatus::Success;
            report.results.push(result);
            if halted {
                report.not_attempted = remaining.by_ref().map(|b| b.name().clone()).collect();
                if !report.not_attempted.is_empty() {
                    log::warn!(
                        "Stopping: {} migration(s) left pending",
                        report.not_attempted.len()
                    );
                }
                break;
            }
        }
        Ok(Outcome::Applied(report))
    }
}

/// Store diagnostic events for a run. A failed write is logged and skipped
/// so the run record still gets closed.
fn flush_events(ledger: &dyn Ledger, id: RunId, events: &[BucketEvent]) {
    for event in events {
        if let Err(e) = ledger.append_event(id, event) {
            log::warn!("Dropped event for run {id} ({}): {e}", event.message);
        }
    }
}

/// Call into a bucket body, turning a panic into [`BucketError::Error`].
fn guarded<F>(body: F) -> BucketResult<()>
where
    F: FnOnce() -> BucketResult<()>,
{
    panic::catch_unwind(AssertUnwindSafe(body)).unwrap_or_else(|payload| {
        let message = payload
            .downcast_ref::<&str>()
            .map(|s| (*s).to_string())
            .or_else(|| payload.downcast_ref::<String>().cloned())
            .unwrap_or_else(|| "unknown panic".to_string());
        Err(BucketError::Error(format!("bucket panicked: {message}")))
    })
}

#[cfg(test)]
#[path = "apply_test.rs"]
mod tests;
