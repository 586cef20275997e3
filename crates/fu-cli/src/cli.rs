//! CLI argument definitions using clap derive API

use clap::{Args, Parser, Subcommand, ValueEnum};
use fu_runner::{ApplyOptions, StrategyKind};

/// Forgeup - ordered one-shot migrations with a run ledger
#[derive(Parser, Debug)]
#[command(name = "forgeup")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Global options
    #[command(flatten)]
    pub global: GlobalArgs,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Global arguments available to all commands
#[derive(Args, Debug, Clone)]
pub struct GlobalArgs {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Path to project directory
    #[arg(short = 'p', long, global = true, default_value = ".")]
    pub project_dir: String,

    /// Override config file path
    #[arg(short, long, global = true)]
    pub config: Option<String>,
}

/// Available subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Discover pending migrations and process them
    RunPending(RunPendingArgs),

    /// Show what the ledger already recorded
    ShowHistory(ShowHistoryArgs),
}

/// Arguments for the run-pending command
#[derive(Args, Debug)]
pub struct RunPendingArgs {
    /// What to do with pending migrations
    #[arg(short, long, value_enum, default_value = "apply")]
    pub strategy: StrategyArg,

    /// Bucket roots, replacing `paths` from the config
    #[arg(long = "path")]
    pub paths: Vec<String>,

    /// Only keep buckets matching these patterns, replacing `include_paths`
    #[arg(long = "include-path")]
    pub include_paths: Vec<String>,

    /// Drop buckets matching these patterns, replacing `exclude_paths`
    #[arg(long = "exclude-path")]
    pub exclude_paths: Vec<String>,

    /// Do not run pre-apply checks
    #[arg(long)]
    pub ignore_pre_apply: bool,

    /// Apply even when pre-apply checks fail
    #[arg(long)]
    pub force: bool,
}

impl RunPendingArgs {
    pub fn apply_options(&self) -> ApplyOptions {
        ApplyOptions {
            ignore_pre_apply: self.ignore_pre_apply,
            force: self.force,
        }
    }
}

/// Strategies for run-pending
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum StrategyArg {
    /// Run each pending migration and record the outcome
    Apply,
    /// Mark pending migrations as applied without running them
    RecordOnly,
    /// List pending migrations without touching anything
    Check,
}

impl From<StrategyArg> for StrategyKind {
    fn from(arg: StrategyArg) -> Self {
        match arg {
            StrategyArg::Apply => StrategyKind::Apply,
            StrategyArg::RecordOnly => StrategyKind::RecordOnly,
            StrategyArg::Check => StrategyKind::Check,
        }
    }
}

/// Arguments for the show-history command
#[derive(Args, Debug)]
pub struct ShowHistoryArgs {
    /// Show one run with its detailed log
    #[arg(short, long, value_name = "ID")]
    pub bucket: Option<i64>,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

#[cfg(test)]
#[path = "cli_test.rs"]
mod tests;
