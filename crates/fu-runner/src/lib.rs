//! fu-runner - Run strategies and orchestration for Forgeup
//!
//! [`Upgrader`] computes the pending set of buckets for a project and hands
//! it to a [`Strategy`]: apply, record-only or check. History reports read
//! the ledger directly.

pub mod error;
pub mod report;
pub mod strategy;
pub mod upgrader;

pub use error::{RunnerError, RunnerResult};
pub use report::{
    ApplyReport, BucketRunResult, CheckEntry, CheckReport, HistoryEntry, HistoryReport, Outcome,
};
pub use strategy::{
    AlreadyAppliedStrategy, ApplyOptions, ApplyStrategy, CheckStrategy, RecordOnlyStrategy,
    Strategy, StrategyKind,
};
pub use upgrader::Upgrader;
