//! [`Ledger`] implementation over the `forgeup.bucket_runs` and
//! `forgeup.bucket_events` tables.

use crate::connection::LedgerDb;
use crate::error::StorageContext;
use chrono::NaiveDateTime;
use duckdb::Row;
use fu_core::{
    Bucket, BucketEvent, EventLevel, Ledger, LedgerError, LedgerResult, RunId, RunRecord,
    RunStatus, SubEvent,
};

const RUN_COLUMNS: &str = "id, script, start_date, end_date, status";

fn now() -> NaiveDateTime {
    chrono::Utc::now().naive_utc()
}

/// Raw `bucket_runs` row before the status code is validated.
struct RunRow {
    id: RunId,
    script: String,
    start_date: NaiveDateTime,
    end_date: Option<NaiveDateTime>,
    status: Option<i16>,
}

impl RunRow {
    fn from_row(row: &Row<'_>) -> duckdb::Result<Self> {
        Ok(Self {
            id: row.get(0)?,
            script: row.get(1)?,
            start_date: row.get(2)?,
            end_date: row.get(3)?,
            status: row.get(4)?,
        })
    }

    fn into_record(self) -> LedgerResult<RunRecord> {
        let status = self.status.map(RunStatus::from_code).transpose()?;
        Ok(RunRecord {
            id: self.id,
            script: self.script,
            start_date: self.start_date,
            end_date: self.end_date,
            status,
        })
    }
}

impl LedgerDb {
    fn ensure_writable(&self, operation: &str) -> LedgerResult<()> {
        if self.is_writable() {
            Ok(())
        } else {
            Err(LedgerError::ReadOnly {
                operation: operation.to_string(),
            })
        }
    }
}

impl Ledger for LedgerDb {
    fn record_start(&self, bucket: &mut Bucket) -> LedgerResult<RunId> {
        self.ensure_writable("open a run record")?;
        let conn = self.conn();
        let id: RunId = conn
            .query_row("SELECT nextval('forgeup.bucket_run_id_seq')", [], |row| {
                row.get(0)
            })
            .storage_context("allocate run id")?;

        conn.execute(
            "INSERT INTO forgeup.bucket_runs (id, script, start_date) VALUES (?, ?, ?)",
            duckdb::params![id, bucket.script(), now()],
        )
        .storage_context("insert bucket_runs")?;

        log::debug!("Run {id} opened for {}", bucket.name());
        bucket.set_id(id);
        Ok(id)
    }

    fn record_end(&self, bucket: &Bucket, status: RunStatus) -> LedgerResult<()> {
        self.ensure_writable("close a run record")?;
        let inconsistent = || LedgerError::Inconsistent {
            script: bucket.script(),
            id: bucket.id(),
        };
        let id = bucket.id().ok_or_else(inconsistent)?;

        // end_date never precedes start_date, even if the clock went backwards
        let updated = self
            .conn()
            .execute(
                "UPDATE forgeup.bucket_runs
                 SET status = ?, end_date = greatest(CAST(? AS TIMESTAMP), start_date)
                 WHERE id = ? AND end_date IS NULL",
                duckdb::params![status.code(), now(), id],
            )
            .storage_context("update bucket_runs")?;

        if updated == 0 {
            return Err(inconsistent());
        }
        log::debug!("Run {id} closed as {}", status.label());
        Ok(())
    }

    fn query_by_status(&self, statuses: &[RunStatus]) -> LedgerResult<Vec<RunRecord>> {
        if !self.has_schema() {
            return Ok(Vec::new());
        }
        let filter = if statuses.is_empty() {
            String::new()
        } else {
            let placeholders = vec!["?"; statuses.len()].join(", ");
            format!("WHERE status IN ({placeholders})")
        };
        let sql = format!(
            "SELECT {RUN_COLUMNS} FROM forgeup.bucket_runs {filter} ORDER BY start_date, id"
        );

        let mut stmt = self
            .conn()
            .prepare(&sql)
            .storage_context("prepare bucket_runs query")?;
        let rows = stmt
            .query_map(
                duckdb::params_from_iter(statuses.iter().map(|s| s.code())),
                RunRow::from_row,
            )
            .storage_context("query bucket_runs")?
            .collect::<Result<Vec<_>, _>>()
            .storage_context("read bucket_runs")?;

        rows.into_iter().map(RunRow::into_record).collect()
    }

    fn summarize(&self, id: RunId) -> LedgerResult<Option<RunRecord>> {
        if !self.has_schema() {
            return Ok(None);
        }
        let result = self.conn().query_row(
            &format!("SELECT {RUN_COLUMNS} FROM forgeup.bucket_runs WHERE id = ?"),
            duckdb::params![id],
            RunRow::from_row,
        );
        match result {
            Ok(row) => row.into_record().map(Some),
            Err(duckdb::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e).storage_context("summarize bucket run"),
        }
    }

    fn detailed_log(&self, id: RunId) -> LedgerResult<Vec<SubEvent>> {
        if !self.has_schema() {
            return Ok(Vec::new());
        }
        let mut stmt = self
            .conn()
            .prepare(
                "SELECT run_id, \"timestamp\", level, message
                 FROM forgeup.bucket_events
                 WHERE run_id = ?
                 ORDER BY \"timestamp\", rowid",
            )
            .storage_context("prepare bucket_events query")?;

        let events = stmt
            .query_map(duckdb::params![id], |row| {
                let level: String = row.get(2)?;
                Ok(SubEvent {
                    run_id: row.get(0)?,
                    timestamp: row.get(1)?,
                    level: EventLevel::parse(&level),
                    message: row.get(3)?,
                })
            })
            .storage_context("query bucket_events")?
            .collect::<Result<Vec<_>, _>>()
            .storage_context("read bucket_events")?;
        Ok(events)
    }

    fn append_event(&self, id: RunId, event: &BucketEvent) -> LedgerResult<()> {
        self.ensure_writable("append an event")?;
        self.conn()
            .execute(
                "INSERT INTO forgeup.bucket_events (run_id, \"timestamp\", level, message)
                 VALUES (?, ?, ?, ?)",
                duckdb::params![id, event.timestamp, event.level.as_str(), event.message],
            )
            .storage_context("insert bucket_events")?;
        Ok(())
    }
}

#[cfg(test)]
#[path = "store_test.rs"]
mod tests;
