//! `forgeup run-pending`: discover pending buckets and run one strategy.

use anyhow::{Context, Result};
use fu_runner::{ApplyReport, CheckReport, Outcome, StrategyKind};

use crate::cli::{GlobalArgs, RunPendingArgs};
use crate::commands::common::{load_project, DiscoveryOverrides, ExitCode, LedgerAccess};
use crate::commands::show_history;

/// Execute the run-pending command.
pub(crate) fn execute(args: &RunPendingArgs, global: &GlobalArgs) -> Result<()> {
    let project = load_project(global)?;
    let overrides = DiscoveryOverrides {
        paths: &args.paths,
        include_paths: &args.include_paths,
        exclude_paths: &args.exclude_paths,
    };
    let kind = StrategyKind::from(args.strategy);
    let access = match kind {
        StrategyKind::Check => LedgerAccess::ReadOnly,
        StrategyKind::Apply | StrategyKind::RecordOnly => LedgerAccess::ReadWrite,
    };
    let upgrader = project.upgrader(&overrides, access)?;

    log::debug!("Running pending migrations with strategy '{kind}'");
    let strategy = kind.build(args.apply_options());
    let outcome = upgrader
        .run_pending(strategy.as_ref())
        .context("Failed to run pending migrations")?;

    match outcome {
        Outcome::UpToDate => println!("System up-to-date"),
        Outcome::Applied(report) => {
            print_apply_report(&report);
            if !report.is_success() {
                return Err(ExitCode(4).into());
            }
        }
        Outcome::Recorded(names) => {
            for name in &names {
                println!("  - {name} (recorded as skipped)");
            }
            println!("\n{} migrations recorded", names.len());
        }
        Outcome::Checked(report) => {
            for line in check_lines(&report) {
                println!("{line}");
            }
        }
        Outcome::History(report) => show_history::print_report(&report, false)?,
    }
    Ok(())
}

fn print_apply_report(report: &ApplyReport) {
    for result in &report.results {
        let millis = (result.duration_secs * 1000.0).round() as u64;
        match &result.error {
            None => println!("  \u{2713} {} [{}ms]", result.bucket, millis),
            Some(e) => println!(
                "  \u{2717} {} ({}) - {} [{}ms]",
                result.bucket,
                result.status.label(),
                e,
                millis
            ),
        }
    }
    if !report.not_attempted.is_empty() {
        println!(
            "  {} migration(s) not attempted after failure",
            report.not_attempted.len()
        );
    }
    println!();
    println!(
        "Completed: {} succeeded, {} failed",
        report.success_count(),
        report.failure_count()
    );
}

/// Pending paths with their descriptions tab-indented beneath.
pub(crate) fn check_lines(report: &CheckReport) -> Vec<String> {
    let mut lines = Vec::new();
    for entry in &report.entries {
        lines.push(entry.path.display().to_string());
        lines.extend(
            entry
                .description
                .lines()
                .filter(|l| !l.trim().is_empty())
                .map(|l| format!("\t{}", l.trim())),
        );
    }
    lines.push(format!("{} migrations pending", report.pending_count()));
    lines
}

#[cfg(test)]
mod tests {
    use super::*;
    use fu_core::BucketName;
    use fu_runner::CheckEntry;
    use std::path::PathBuf;

    #[test]
    fn test_check_lines() {
        let report = CheckReport {
            entries: vec![CheckEntry {
                name: BucketName::try_new("20200202_addcol.sql").unwrap(),
                path: PathBuf::from("/srv/migrations/20200202_addcol.sql"),
                description: "Add email\n  and backfill it\n".to_string(),
            }],
        };
        assert_eq!(
            check_lines(&report),
            vec![
                "/srv/migrations/20200202_addcol.sql",
                "\tAdd email",
                "\tand backfill it",
                "1 migrations pending",
            ]
        );
    }

    #[test]
    fn test_check_lines_empty() {
        assert_eq!(
            check_lines(&CheckReport::default()),
            vec!["0 migrations pending"]
        );
    }
}
