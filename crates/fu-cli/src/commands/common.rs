//! Shared utilities for CLI commands

use anyhow::{Context, Result};
use fu_core::{
    ApiRegistry, BucketFactory, BucketLocator, BucketRegistry, Config, PathFilter, TargetService,
    DB_API,
};
use fu_db::DuckDbBackend;
use fu_ledger::LedgerDb;
use fu_runner::Upgrader;
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::cli::GlobalArgs;

const IN_MEMORY: &str = ":memory:";

/// Error type representing a non-zero process exit code.
///
/// Use `return Err(ExitCode(N).into())` instead of `std::process::exit(N)`
/// so that destructors run and the databases close cleanly.
#[derive(Debug)]
pub(crate) struct ExitCode(pub(crate) u8);

impl fmt::Display for ExitCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Control flow only; main() never prints it.
        write!(f, "")
    }
}

impl std::error::Error for ExitCode {}

/// A loaded project: its root directory and parsed config.
#[derive(Debug)]
pub(crate) struct Project {
    pub(crate) root: PathBuf,
    pub(crate) config: Config,
}

/// Load the project from `--project-dir`, honoring `--config`.
pub(crate) fn load_project(global: &GlobalArgs) -> Result<Project> {
    let root = PathBuf::from(&global.project_dir);
    let config = match &global.config {
        Some(path) => Config::load(Path::new(path)),
        None => Config::load_from_dir(&root),
    }
    .context("Failed to load project")?;
    log::debug!("Loaded project '{}' from {}", config.name, root.display());
    Ok(Project { root, config })
}

/// Command-line replacements for the discovery settings in the config.
#[derive(Debug, Default)]
pub(crate) struct DiscoveryOverrides<'a> {
    pub(crate) paths: &'a [String],
    pub(crate) include_paths: &'a [String],
    pub(crate) exclude_paths: &'a [String],
}

/// How a command uses the ledger.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum LedgerAccess {
    /// Create the ledger tables if needed and record runs.
    ReadWrite,
    /// Read history only. Nothing is created in either database.
    ReadOnly,
}

fn pick<'a>(cli: &'a [String], config: &'a [String]) -> &'a [String] {
    if cli.is_empty() {
        config
    } else {
        cli
    }
}

impl Project {
    /// Open the target database named by `database.path`.
    pub(crate) fn open_target(&self) -> Result<Arc<DuckDbBackend>> {
        let path = self.config.database_path(&self.root);
        let db = DuckDbBackend::new(&path)
            .with_context(|| format!("Failed to open target database: {path}"))?;
        Ok(Arc::new(db))
    }

    /// True when the ledger lives in memory, so nothing it records
    /// survives the process.
    pub(crate) fn history_is_ephemeral(&self) -> bool {
        match self.config.ledger_path(&self.root) {
            Some(path) => path == IN_MEMORY,
            None => self.config.database_path(&self.root) == IN_MEMORY,
        }
    }

    /// Open the ledger: a separate file when `ledger.path` is set, otherwise
    /// the target database itself.
    pub(crate) fn open_ledger(
        &self,
        target: &DuckDbBackend,
        access: LedgerAccess,
    ) -> Result<LedgerDb> {
        if self.history_is_ephemeral() {
            log::warn!(
                "Ledger is in memory and run history is lost on exit; \
                 set database.path or ledger.path to keep it"
            );
        }

        let ledger = match (self.config.ledger_path(&self.root), access) {
            (Some(path), _) if path == IN_MEMORY => LedgerDb::open_memory(),
            (Some(path), LedgerAccess::ReadWrite) => LedgerDb::open(Path::new(&path)),
            (Some(path), LedgerAccess::ReadOnly) => LedgerDb::inspect_path(Path::new(&path)),
            (None, access) => {
                let conn = target
                    .try_clone_connection()
                    .context("Failed to share the target connection with the ledger")?;
                match access {
                    LedgerAccess::ReadWrite => LedgerDb::from_connection(conn),
                    LedgerAccess::ReadOnly => LedgerDb::inspect(conn),
                }
            }
        };
        ledger.context("Failed to open ledger")
    }

    /// Wire locator, factory and ledger for this project.
    pub(crate) fn upgrader(
        &self,
        overrides: &DiscoveryOverrides<'_>,
        access: LedgerAccess,
    ) -> Result<Upgrader<LedgerDb>> {
        let roots: Vec<PathBuf> = if overrides.paths.is_empty() {
            self.config.paths_absolute(&self.root)
        } else {
            overrides.paths.iter().map(|p| self.root.join(p)).collect()
        };
        let filter = PathFilter::new(
            pick(overrides.include_paths, &self.config.include_paths),
            pick(overrides.exclude_paths, &self.config.exclude_paths),
        )
        .context("Invalid path filter")?
        .relative_to(&self.root);

        let target = self.open_target()?;
        let ledger = self.open_ledger(&target, access)?;
        let api = ApiRegistry::new().with(DB_API, target as Arc<dyn TargetService>);
        let registry = BucketRegistry::new().with_sql_scripts(self.config.sql_scripts);

        Ok(Upgrader::new(
            BucketLocator::new(roots, filter),
            BucketFactory::new(registry, Arc::new(api)),
            ledger,
        ))
    }
}

/// Calculate column widths for table output.
///
/// Returns a vector of widths, one per column, based on the maximum of
/// the header length and all row cell lengths.
pub(crate) fn calculate_column_widths(headers: &[&str], rows: &[Vec<String>]) -> Vec<usize> {
    let mut widths: Vec<usize> = headers.iter().map(|h| h.len()).collect();
    for row in rows {
        for (w, cell) in widths.iter_mut().zip(row.iter()) {
            *w = (*w).max(cell.chars().count());
        }
    }
    widths
}

/// Render a left-aligned table: header row, a dash separator, then rows.
/// Columns are separated by two spaces.
pub(crate) fn format_table(headers: &[&str], rows: &[Vec<String>]) -> Vec<String> {
    let widths = calculate_column_widths(headers, rows);
    let render = |cells: Vec<&str>| {
        cells
            .iter()
            .zip(&widths)
            .map(|(cell, &w)| format!("{:<width$}", cell, width = w))
            .collect::<Vec<_>>()
            .join("  ")
            .trim_end()
            .to_string()
    };

    let mut lines = Vec::with_capacity(rows.len() + 2);
    lines.push(render(headers.to_vec()));
    lines.push(
        widths
            .iter()
            .map(|&w| "-".repeat(w))
            .collect::<Vec<_>>()
            .join("  "),
    );
    for row in rows {
        lines.push(render(row.iter().map(String::as_str).collect()));
    }
    lines
}

/// Print a formatted table to stdout.
pub(crate) fn print_table(headers: &[&str], rows: &[Vec<String>]) {
    for line in format_table(headers, rows) {
        println!("{line}");
    }
}

#[cfg(test)]
#[path = "common_test.rs"]
mod tests;
