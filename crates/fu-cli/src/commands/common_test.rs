use super::*;
use tempfile::TempDir;

fn global(dir: &Path) -> GlobalArgs {
    GlobalArgs {
        verbose: false,
        project_dir: dir.display().to_string(),
        config: None,
    }
}

#[test]
fn test_column_widths_use_longest_cell() {
    let rows = vec![vec!["1".to_string(), "20200101_init.sql".to_string()]];
    assert_eq!(calculate_column_widths(&["Id", "Script"], &rows), vec![2, 17]);
}

#[test]
fn test_format_table_layout() {
    let rows = vec![
        vec!["1".to_string(), "success".to_string()],
        vec!["12".to_string(), String::new()],
    ];
    let lines = format_table(&["Id", "Status"], &rows);
    assert_eq!(
        lines,
        vec!["Id  Status", "--  -------", "1   success", "12"]
    );
}

#[test]
fn test_load_project_missing_config() {
    let tmp = TempDir::new().unwrap();
    let err = load_project(&global(tmp.path())).unwrap_err();
    assert!(format!("{err:#}").contains("[E001]"));
}

#[test]
fn test_cli_paths_replace_config_paths() {
    let tmp = TempDir::new().unwrap();
    std::fs::write(tmp.path().join("forgeup.yml"), "name: demo\npaths: [missing]\n").unwrap();
    std::fs::create_dir_all(tmp.path().join("db/updates")).unwrap();
    std::fs::write(tmp.path().join("db/updates/20200101_init.sql"), "SELECT 1;").unwrap();

    let project = load_project(&global(tmp.path())).unwrap();
    let paths = vec!["db/updates".to_string()];
    let overrides = DiscoveryOverrides {
        paths: &paths,
        ..DiscoveryOverrides::default()
    };
    let pending = project.upgrader(&overrides, LedgerAccess::ReadWrite).unwrap().pending().unwrap();
    assert_eq!(pending.len(), 1);

    // without the override the configured root is missing
    let upgrader = project
        .upgrader(&DiscoveryOverrides::default(), LedgerAccess::ReadWrite)
        .unwrap();
    assert!(upgrader.pending().is_err());
}

#[test]
fn test_separate_ledger_file() {
    let tmp = TempDir::new().unwrap();
    std::fs::write(
        tmp.path().join("forgeup.yml"),
        "name: demo\ndatabase:\n  path: warehouse.duckdb\nledger:\n  path: target/ledger.duckdb\n",
    )
    .unwrap();

    let project = load_project(&global(tmp.path())).unwrap();
    let target = project.open_target().unwrap();
    project
        .open_ledger(&target, LedgerAccess::ReadWrite)
        .unwrap();
    assert!(tmp.path().join("target/ledger.duckdb").exists());
    assert!(!target.relation_exists("forgeup.bucket_runs").unwrap());
}

fn write_project(dir: &Path, config: &str) -> Project {
    std::fs::write(dir.join("forgeup.yml"), config).unwrap();
    load_project(&global(dir)).unwrap()
}

#[test]
fn test_read_only_ledger_leaves_target_untouched() {
    let tmp = TempDir::new().unwrap();
    let project = write_project(
        tmp.path(),
        "name: demo\ndatabase:\n  path: warehouse.duckdb\n",
    );
    let target = project.open_target().unwrap();
    let ledger = project
        .open_ledger(&target, LedgerAccess::ReadOnly)
        .unwrap();

    assert!(!ledger.is_writable());
    assert!(!target.relation_exists("forgeup.bucket_runs").unwrap());
    assert!(!target.relation_exists("forgeup.schema_version").unwrap());
}

#[test]
fn test_read_only_separate_ledger_is_not_created() {
    let tmp = TempDir::new().unwrap();
    let project = write_project(
        tmp.path(),
        "name: demo\ndatabase:\n  path: warehouse.duckdb\nledger:\n  path: target/ledger.duckdb\n",
    );
    let target = project.open_target().unwrap();
    project
        .open_ledger(&target, LedgerAccess::ReadOnly)
        .unwrap();
    assert!(!tmp.path().join("target/ledger.duckdb").exists());
}

#[test]
fn test_history_is_ephemeral() {
    let tmp = TempDir::new().unwrap();
    assert!(write_project(tmp.path(), "name: demo\n").history_is_ephemeral());
    assert!(write_project(
        tmp.path(),
        "name: demo\nledger:\n  path: \":memory:\"\n"
    )
    .history_is_ephemeral());
    assert!(!write_project(
        tmp.path(),
        "name: demo\nledger:\n  path: ledger.duckdb\n"
    )
    .history_is_ephemeral());
    assert!(!write_project(
        tmp.path(),
        "name: demo\ndatabase:\n  path: warehouse.duckdb\n"
    )
    .history_is_ephemeral());
    // a file-backed target does not help when the ledger is in memory
    assert!(write_project(
        tmp.path(),
        "name: demo\ndatabase:\n  path: warehouse.duckdb\nledger:\n  path: \":memory:\"\n"
    )
    .history_is_ephemeral());
}

#[test]
fn test_exclude_relative_to_project_dir() {
    let tmp = TempDir::new().unwrap();
    let project = write_project(tmp.path(), "name: demo\nexclude_paths: [migrations/b]\n");
    std::fs::create_dir_all(tmp.path().join("migrations/b")).unwrap();
    std::fs::write(tmp.path().join("migrations/20200101_a.sql"), "SELECT 1;").unwrap();
    std::fs::write(tmp.path().join("migrations/b/20200303_b.sql"), "SELECT 1;").unwrap();

    let pending = project
        .upgrader(&DiscoveryOverrides::default(), LedgerAccess::ReadOnly)
        .unwrap()
        .pending()
        .unwrap();
    let names: Vec<&str> = pending.iter().map(|b| b.name().as_str()).collect();
    assert_eq!(names, vec!["20200101_a.sql"]);
}
