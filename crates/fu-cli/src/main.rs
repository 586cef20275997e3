//! Forgeup CLI - ordered one-shot migrations with a run ledger

use anyhow::Result;
use clap::Parser;
use log::LevelFilter;

mod cli;
mod commands;

use cli::Cli;
use commands::common::ExitCode;
use commands::{run_pending, show_history};

/// `info` by default, `debug` with `--verbose`; `RUST_LOG` wins when set.
fn init_logger(verbose: bool) {
    let level = if verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };
    env_logger::Builder::new()
        .filter_level(level)
        .format_timestamp(None)
        .parse_default_env()
        .init();
}

fn run(cli: &Cli) -> Result<()> {
    match &cli.command {
        cli::Commands::RunPending(args) => run_pending::execute(args, &cli.global),
        cli::Commands::ShowHistory(args) => show_history::execute(args, &cli.global),
    }
}

fn main() -> std::process::ExitCode {
    let cli = Cli::parse();
    init_logger(cli.global.verbose);

    match run(&cli) {
        Ok(()) => std::process::ExitCode::SUCCESS,
        Err(err) => match err.downcast_ref::<ExitCode>() {
            Some(code) => std::process::ExitCode::from(code.0),
            None => {
                eprintln!("Error: {err:#}");
                std::process::ExitCode::FAILURE
            }
        },
    }
}
