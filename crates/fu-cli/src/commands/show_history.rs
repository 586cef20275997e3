//! `forgeup show-history`: report what the ledger recorded.

use anyhow::{Context, Result};
use fu_runner::{HistoryEntry, HistoryReport};

use crate::cli::{GlobalArgs, ShowHistoryArgs};
use crate::commands::common::{load_project, print_table, DiscoveryOverrides, LedgerAccess};

const HEADERS: [&str; 5] = ["Start date", "Execution", "Status", "Id", "Script"];

/// Execute the show-history command.
pub(crate) fn execute(args: &ShowHistoryArgs, global: &GlobalArgs) -> Result<()> {
    let project = load_project(global)?;
    let upgrader = project.upgrader(&DiscoveryOverrides::default(), LedgerAccess::ReadOnly)?;
    let report = upgrader
        .show_history(args.bucket)
        .context("Failed to read history")?;
    print_report(&report, args.json)
}

pub(crate) fn print_report(report: &HistoryReport, json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(report)?);
        return Ok(());
    }

    match report {
        HistoryReport::All(entries) if entries.is_empty() => println!("No migration recorded"),
        HistoryReport::All(entries) => {
            let rows: Vec<Vec<String>> = entries.iter().map(row).collect();
            print_table(&HEADERS, &rows);
        }
        HistoryReport::Run { run, events } => {
            print_table(&HEADERS, &[row(run)]);
            println!();
            for event in events {
                println!(
                    "{} {:<5} {}",
                    event.timestamp.format("%Y-%m-%d %H:%M:%S"),
                    event.level.as_str(),
                    event.message
                );
            }
        }
    }
    Ok(())
}

fn row(entry: &HistoryEntry) -> Vec<String> {
    vec![
        entry.start_date.format("%Y-%m-%d %H:%M:%S").to_string(),
        entry.execution.clone(),
        entry.status.clone(),
        entry.id.to_string(),
        entry.script.clone(),
    ]
}
