use super::*;
use clap::CommandFactory;

#[test]
fn test_cli_definition_is_valid() {
    Cli::command().debug_assert();
}

#[test]
fn test_run_pending_defaults_to_apply() {
    let cli = Cli::try_parse_from(["forgeup", "run-pending"]).unwrap();
    let Commands::RunPending(args) = cli.command else {
        panic!("expected run-pending");
    };
    assert_eq!(args.strategy, StrategyArg::Apply);
    assert_eq!(args.apply_options(), ApplyOptions::default());
    assert!(args.paths.is_empty());
    assert_eq!(cli.global.project_dir, ".");
}

#[test]
fn test_run_pending_options() {
    let cli = Cli::try_parse_from([
        "forgeup",
        "-p",
        "/srv/forge",
        "run-pending",
        "--strategy",
        "record-only",
        "--path",
        "migrations",
        "--path",
        "plugins/tracker/db",
        "--include-path",
        "migrations/core",
        "--exclude-path",
        "migrations/core/legacy",
        "--force",
    ])
    .unwrap();
    let Commands::RunPending(args) = cli.command else {
        panic!("expected run-pending");
    };
    assert_eq!(StrategyKind::from(args.strategy), StrategyKind::RecordOnly);
    assert_eq!(args.paths, vec!["migrations", "plugins/tracker/db"]);
    assert_eq!(args.include_paths, vec!["migrations/core"]);
    assert_eq!(args.exclude_paths, vec!["migrations/core/legacy"]);
    assert!(args.apply_options().force);
    assert!(!args.apply_options().ignore_pre_apply);
    assert_eq!(cli.global.project_dir, "/srv/forge");
}

#[test]
fn test_unknown_strategy_rejected() {
    assert!(Cli::try_parse_from(["forgeup", "run-pending", "--strategy", "all"]).is_err());
}

#[test]
fn test_show_history_bucket_id() {
    let cli = Cli::try_parse_from(["forgeup", "show-history", "--bucket", "42", "--json"]).unwrap();
    let Commands::ShowHistory(args) = cli.command else {
        panic!("expected show-history");
    };
    assert_eq!(args.bucket, Some(42));
    assert!(args.json);
}

#[test]
fn test_show_history_bucket_must_be_numeric() {
    assert!(Cli::try_parse_from(["forgeup", "show-history", "--bucket", "init"]).is_err());
}
