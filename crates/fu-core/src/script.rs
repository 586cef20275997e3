//! Plain `.sql` files as buckets.
//!
//! A script bucket's description is its leading block of `--` comments and
//! its body is the whole file, sent to the target service as one batch.

use crate::bucket::{BucketContext, Migration};
use crate::error::BucketResult;

/// A migration backed by the contents of a `.sql` file.
#[derive(Debug, Clone)]
pub struct SqlScript {
    sql: String,
    description: String,
}

impl SqlScript {
    pub fn new(sql: impl Into<String>) -> Self {
        let sql = sql.into();
        let description = leading_comment(&sql);
        Self { sql, description }
    }

    pub fn sql(&self) -> &str {
        &self.sql
    }
}

/// Collect the `--` comment lines at the top of a script, markers stripped.
fn leading_comment(sql: &str) -> String {
    sql.lines()
        .map(str::trim)
        .skip_while(|line| line.is_empty())
        .map_while(|line| line.strip_prefix("--"))
        .map(str::trim)
        .collect::<Vec<_>>()
        .join("\n")
}

impl Migration for SqlScript {
    fn description(&self) -> String {
        self.description.clone()
    }

    fn apply(&self, ctx: &BucketContext<'_>) -> BucketResult<()> {
        let db = ctx.db()?;
        ctx.debug(format!("executing script on {}", db.service_type()));
        db.execute_batch(&self.sql)?;
        ctx.info("script executed");
        Ok(())
    }
}
