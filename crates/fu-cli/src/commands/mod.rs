//! CLI command implementations

pub(crate) mod common;
pub(crate) mod run_pending;
pub(crate) mod show_history;
