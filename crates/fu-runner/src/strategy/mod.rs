//! Run strategies: what to do with the pending buckets of one invocation.
//!
//! A strategy is picked once per run through [`StrategyKind`] and receives
//! the pending set in basename order.

mod already_applied;
mod apply;
mod check;
mod record_only;

pub use already_applied::AlreadyAppliedStrategy;
pub use apply::{ApplyOptions, ApplyStrategy};
pub use check::CheckStrategy;
pub use record_only::RecordOnlyStrategy;

use crate::error::RunnerResult;
use crate::report::Outcome;
use fu_core::{Bucket, Ledger};
use std::fmt;
use std::str::FromStr;

/// One run mode.
pub trait Strategy {
    /// Process `buckets` (already filtered to the pending set, in order).
    fn proceed(&self, ledger: &dyn Ledger, buckets: Vec<Bucket>) -> RunnerResult<Outcome>;
}

/// Strategies selectable for a pending run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StrategyKind {
    #[default]
    Apply,
    RecordOnly,
    Check,
}

impl StrategyKind {
    /// Instantiate the strategy. `options` only matter for [`StrategyKind::Apply`].
    pub fn build(self, options: ApplyOptions) -> Box<dyn Strategy> {
        match self {
            StrategyKind::Apply => Box::new(ApplyStrategy::new(options)),
            StrategyKind::RecordOnly => Box::new(RecordOnlyStrategy),
            StrategyKind::Check => Box::new(CheckStrategy),
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            StrategyKind::Apply => "apply",
            StrategyKind::RecordOnly => "record-only",
            StrategyKind::Check => "check",
        }
    }
}

impl fmt::Display for StrategyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for StrategyKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "apply" => Ok(StrategyKind::Apply),
            "record-only" => Ok(StrategyKind::RecordOnly),
            "check" => Ok(StrategyKind::Check),
            other => Err(format!(
                "unknown strategy '{other}' (expected apply, record-only or check)"
            )),
        }
    }
}
