use super::*;
use crate::api::ApiRegistry;
use crate::bucket::{BucketContext, Migration};
use crate::error::BucketResult;
use chrono::NaiveDate;
use std::path::PathBuf;
use std::sync::Arc;

struct Noop;

impl Migration for Noop {
    fn description(&self) -> String {
        String::new()
    }
    fn apply(&self, _ctx: &BucketContext<'_>) -> BucketResult<()> {
        Ok(())
    }
}

fn bucket(name: &str) -> Bucket {
    Bucket::new(
        BucketName::try_new(name).unwrap(),
        PathBuf::from(format!("/srv/migrations/{name}")),
        Arc::new(ApiRegistry::new()),
        Box::new(Noop),
    )
}

fn record(id: i64, script: &str, status: Option<RunStatus>) -> RunRecord {
    let start = NaiveDate::from_ymd_opt(2020, 1, 1)
        .unwrap()
        .and_hms_opt(0, 0, id as u32)
        .unwrap();
    RunRecord {
        id,
        script: script.to_string(),
        start_date: start,
        end_date: status.map(|_| start),
        status,
    }
}

fn names(buckets: &[Bucket]) -> Vec<&str> {
    buckets.iter().map(|b| b.name().as_str()).collect()
}

#[test]
fn test_empty_ledger_keeps_everything_in_order() {
    let pending = remove_applied(
        vec![bucket("20200101_init"), bucket("20200202_addcol")],
        &[],
    );
    assert_eq!(names(&pending), vec!["20200101_init", "20200202_addcol"]);
}

#[test]
fn test_success_removes_bucket() {
    let records = vec![record(
        1,
        "/srv/migrations/20200101_init",
        Some(RunStatus::Success),
    )];
    let pending = remove_applied(
        vec![bucket("20200101_init"), bucket("20200202_addcol")],
        &records,
    );
    assert_eq!(names(&pending), vec!["20200202_addcol"]);
}

#[test]
fn test_matching_is_by_basename_not_full_path() {
    let records = vec![record(1, "/old/location/20200101_init", Some(RunStatus::Skip))];
    let pending = remove_applied(vec![bucket("20200101_init")], &records);
    assert!(pending.is_empty());
}

#[test]
fn test_failure_and_error_stay_pending() {
    let records = vec![
        record(1, "/srv/migrations/a", Some(RunStatus::Failure)),
        record(2, "/srv/migrations/b", Some(RunStatus::Error)),
    ];
    let pending = remove_applied(vec![bucket("a"), bucket("b")], &records);
    assert_eq!(names(&pending), vec!["a", "b"]);
}

#[test]
fn test_open_record_does_not_count_as_applied() {
    let records = vec![record(1, "/srv/migrations/a", None)];
    assert!(applied_names(&records).is_empty());
}

#[test]
fn test_later_success_after_failure_removes() {
    let records = vec![
        record(1, "/srv/migrations/a", Some(RunStatus::Failure)),
        record(2, "/srv/migrations/a", Some(RunStatus::Success)),
    ];
    assert!(remove_applied(vec![bucket("a")], &records).is_empty());
}
