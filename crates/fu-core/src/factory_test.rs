use super::*;
use crate::bucket::BucketContext;
use crate::bucket_name::BucketName;
use crate::error::BucketResult;
use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};
use tempfile::TempDir;

#[derive(Default)]
struct Init;

impl Migration for Init {
    fn description(&self) -> String {
        "Create initial schema".to_string()
    }

    fn apply(&self, _ctx: &BucketContext<'_>) -> BucketResult<()> {
        Ok(())
    }
}

fn candidate(path: &Path) -> Candidate {
    Candidate {
        name: BucketName::from_path(path).unwrap(),
        path: path.to_path_buf(),
        root: path.parent().unwrap().to_path_buf(),
    }
}

fn factory(registry: BucketRegistry) -> BucketFactory {
    BucketFactory::new(registry, Arc::new(ApiRegistry::new()))
}

#[test]
fn test_identifier_strips_extension_and_prefixes_marker() {
    assert_eq!(
        bucket_identifier(Path::new("migrations/201004081445_add_tables.rs")).as_deref(),
        Some("b201004081445_add_tables")
    );
    assert_eq!(
        bucket_identifier(Path::new("/x/20200101_init")).as_deref(),
        Some("b20200101_init")
    );
}

#[test]
fn test_registered_identifier_resolves() {
    let mut registry = BucketRegistry::new();
    registry.register_type::<Init>("b20200101_init");

    let path = PathBuf::from("/srv/migrations/20200101_init.rs");
    let bucket = factory(registry).resolve(&candidate(&path)).unwrap().unwrap();
    assert_eq!(bucket.name(), "20200101_init.rs");
    assert_eq!(bucket.path(), path);
    assert_eq!(bucket.description(), "Create initial schema");
    assert_eq!(bucket.id(), None);
}

#[test]
fn test_unregistered_file_is_not_a_bucket() {
    let path = PathBuf::from("/srv/migrations/README.md");
    let resolved = factory(BucketRegistry::new())
        .resolve(&candidate(&path))
        .unwrap();
    assert!(resolved.is_none());
}

#[test]
fn test_constructor_receives_path() {
    let calls = Arc::new(AtomicUsize::new(0));
    let seen = Arc::clone(&calls);
    let registry = BucketRegistry::new().with("b20200101_init", move |path| {
        assert!(path.ends_with("20200101_init.rs"));
        seen.fetch_add(1, Ordering::SeqCst);
        Box::new(Init)
    });

    let path = PathBuf::from("/srv/20200101_init.rs");
    assert!(factory(registry).resolve(&candidate(&path)).unwrap().is_some());
    assert_eq!(calls.load(Ordering::SeqCst), 1);
}

#[test]
fn test_sql_scripts_resolve_when_enabled() {
    let tmp = TempDir::new().unwrap();
    let path = tmp.path().join("20200101_init.sql");
    std::fs::write(&path, "-- Create users\nCREATE TABLE users (id INT);").unwrap();

    let disabled = factory(BucketRegistry::new())
        .resolve(&candidate(&path))
        .unwrap();
    assert!(disabled.is_none());

    let bucket = factory(BucketRegistry::new().with_sql_scripts(true))
        .resolve(&candidate(&path))
        .unwrap()
        .unwrap();
    assert_eq!(bucket.description(), "Create users");
}

#[test]
fn test_registered_constructor_beats_sql_script() {
    let tmp = TempDir::new().unwrap();
    let path = tmp.path().join("20200101_init.sql");
    std::fs::write(&path, "-- from file\nSELECT 1;").unwrap();

    let mut registry = BucketRegistry::new().with_sql_scripts(true);
    registry.register_type::<Init>("b20200101_init");

    let bucket = factory(registry).resolve(&candidate(&path)).unwrap().unwrap();
    assert_eq!(bucket.description(), "Create initial schema");
}

#[test]
fn test_resolve_all_keeps_order_and_drops_non_buckets() {
    let mut registry = BucketRegistry::new();
    registry.register_type::<Init>("b20200101_init");
    registry.register_type::<Init>("b20200202_addcol");

    let candidates: Vec<Candidate> = [
        "/srv/20200101_init.rs",
        "/srv/20200115_notes.txt",
        "/srv/20200202_addcol.rs",
    ]
    .iter()
    .map(|p| candidate(Path::new(p)))
    .collect();

    let buckets = factory(registry).resolve_all(&candidates).unwrap();
    let names: Vec<&str> = buckets.iter().map(|b| b.name().as_str()).collect();
    assert_eq!(names, vec!["20200101_init.rs", "20200202_addcol.rs"]);
}

#[test]
fn test_registry_debug_is_sorted() {
    let mut registry = BucketRegistry::new();
    registry.register_type::<Init>("b2");
    registry.register_type::<Init>("b1");
    assert_eq!(registry.len(), 2);
    assert!(registry.contains("b1"));
    assert_eq!(
        format!("{registry:?}"),
        r#"BucketRegistry { constructors: ["b1", "b2"], sql_scripts: false }"#
    );
}
