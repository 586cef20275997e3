//! Migration units ("buckets") and the context their bodies run in.

use crate::api::{ApiRegistry, TargetService, DB_API};
use crate::bucket_name::BucketName;
use crate::error::{BucketError, BucketResult};
use crate::record::RunId;
use crate::status::EventLevel;
use chrono::NaiveDateTime;
use std::cell::RefCell;
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Behavior of a single migration.
///
/// Return [`BucketError::Failure`] when the migration itself decides the
/// upgrade cannot complete; errors from host services convert into
/// [`BucketError::Error`] through `?`.
pub trait Migration {
    /// Human-readable description, possibly multi-line.
    fn description(&self) -> String;

    /// Precondition check run for every pending bucket before any is applied.
    fn pre_apply(&self, _ctx: &BucketContext<'_>) -> BucketResult<()> {
        Ok(())
    }

    /// Apply the change.
    fn apply(&self, ctx: &BucketContext<'_>) -> BucketResult<()>;

    /// Verification run right after a successful [`apply`](Self::apply).
    fn post_apply(&self, _ctx: &BucketContext<'_>) -> BucketResult<()> {
        Ok(())
    }
}

/// An event logged by a bucket body, stamped when it was logged.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BucketEvent {
    pub timestamp: NaiveDateTime,
    pub level: EventLevel,
    pub message: String,
}

impl BucketEvent {
    /// An event stamped with the current UTC time.
    pub fn now(level: EventLevel, message: impl Into<String>) -> Self {
        Self {
            timestamp: chrono::Utc::now().naive_utc(),
            level,
            message: message.into(),
        }
    }
}

/// What a bucket body can reach while it runs: the host API registry and
/// an event log that ends up attached to the current run record.
pub struct BucketContext<'a> {
    name: &'a BucketName,
    api: &'a ApiRegistry,
    events: RefCell<Vec<BucketEvent>>,
}

impl<'a> BucketContext<'a> {
    pub fn new(name: &'a BucketName, api: &'a ApiRegistry) -> Self {
        Self {
            name,
            api,
            events: RefCell::new(Vec::new()),
        }
    }

    /// Basename of the bucket being run.
    pub fn bucket_name(&self) -> &BucketName {
        self.name
    }

    /// Look up a host service by capability name.
    pub fn api(&self, name: &str) -> BucketResult<&'a dyn TargetService> {
        self.api
            .get(name)
            .map(|svc| &**svc)
            .ok_or_else(|| BucketError::Error(format!("no service registered as '{name}'")))
    }

    /// The target database service.
    pub fn db(&self) -> BucketResult<&'a dyn TargetService> {
        self.api(DB_API)
    }

    /// Record an event for this run and forward it to the logger.
    pub fn log(&self, level: EventLevel, message: impl Into<String>) {
        let event = BucketEvent::now(level, message);
        log::log!(target: "forgeup::bucket", level.log_level(), "[{}] {}", self.name, event.message);
        self.events.borrow_mut().push(event);
    }

    pub fn debug(&self, message: impl Into<String>) {
        self.log(EventLevel::Debug, message);
    }

    pub fn info(&self, message: impl Into<String>) {
        self.log(EventLevel::Info, message);
    }

    pub fn warn(&self, message: impl Into<String>) {
        self.log(EventLevel::Warn, message);
    }

    pub fn error(&self, message: impl Into<String>) {
        self.log(EventLevel::Error, message);
    }

    /// Drain the events logged so far.
    pub fn take_events(&self) -> Vec<BucketEvent> {
        std::mem::take(&mut *self.events.borrow_mut())
    }
}

/// A resolved migration unit from one discovery pass.
///
/// The id is `None` until the ledger opens a run for it.
pub struct Bucket {
    name: BucketName,
    path: PathBuf,
    id: Option<RunId>,
    api: Arc<ApiRegistry>,
    body: Box<dyn Migration>,
}

impl Bucket {
    pub fn new(
        name: BucketName,
        path: PathBuf,
        api: Arc<ApiRegistry>,
        body: Box<dyn Migration>,
    ) -> Self {
        Self {
            name,
            path,
            id: None,
            api,
            body,
        }
    }

    pub fn name(&self) -> &BucketName {
        &self.name
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Script identifier written to the ledger.
    pub fn script(&self) -> String {
        self.path.display().to_string()
    }

    pub fn id(&self) -> Option<RunId> {
        self.id
    }

    /// Set by the ledger when a run starts.
    pub fn set_id(&mut self, id: RunId) {
        self.id = Some(id);
    }

    pub fn description(&self) -> String {
        self.body.description()
    }

    pub fn migration(&self) -> &dyn Migration {
        self.body.as_ref()
    }

    /// Fresh context for one call into the bucket body.
    pub fn context(&self) -> BucketContext<'_> {
        BucketContext::new(&self.name, &self.api)
    }
}

impl fmt::Debug for Bucket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Bucket")
            .field("name", &self.name)
            .field("path", &self.path)
            .field("id", &self.id)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
#[path = "bucket_test.rs"]
mod tests;
