//! Resolve candidate files into buckets.
//!
//! Each file maps to a logical identifier: its stem prefixed with `b`
//! (`migrations/201004081445_add_tables.rs` -> `b201004081445_add_tables`).
//! The identifier is looked up in a compiled [`BucketRegistry`]. Files with
//! no registered constructor are not buckets; that is expected, since
//! migration directories routinely hold other files.

use crate::api::ApiRegistry;
use crate::bucket::{Bucket, Migration};
use crate::error::{CoreError, CoreResult};
use crate::locator::Candidate;
use crate::script::SqlScript;
use std::collections::HashMap;
use std::fmt;
use std::path::Path;
use std::sync::Arc;

/// Prefix that keeps identifiers from starting with a digit.
pub const IDENTIFIER_MARKER: &str = "b";

/// Constructor for a compiled migration, given the file it was found at.
pub type MigrationCtor = Arc<dyn Fn(&Path) -> Box<dyn Migration> + Send + Sync>;

/// Derive the logical identifier for a bucket file.
pub fn bucket_identifier(path: &Path) -> Option<String> {
    let stem = path.file_stem()?.to_str()?;
    if stem.is_empty() {
        return None;
    }
    Some(format!("{IDENTIFIER_MARKER}{stem}"))
}

/// Compiled lookup table from identifier to migration constructor.
#[derive(Clone, Default)]
pub struct BucketRegistry {
    constructors: HashMap<String, MigrationCtor>,
    sql_scripts: bool,
}

impl BucketRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a constructor under `identifier`, replacing any previous one.
    pub fn register<F>(&mut self, identifier: impl Into<String>, ctor: F)
    where
        F: Fn(&Path) -> Box<dyn Migration> + Send + Sync + 'static,
    {
        self.constructors.insert(identifier.into(), Arc::new(ctor));
    }

    /// Register a `Default`-constructible migration type.
    pub fn register_type<M>(&mut self, identifier: impl Into<String>)
    where
        M: Migration + Default + 'static,
    {
        self.register(identifier, |_| Box::new(M::default()));
    }

    /// Builder-style [`register`](Self::register).
    pub fn with<F>(mut self, identifier: impl Into<String>, ctor: F) -> Self
    where
        F: Fn(&Path) -> Box<dyn Migration> + Send + Sync + 'static,
    {
        self.register(identifier, ctor);
        self
    }

    /// Resolve unregistered `.sql` files to [`SqlScript`] buckets.
    pub fn with_sql_scripts(mut self, enabled: bool) -> Self {
        self.sql_scripts = enabled;
        self
    }

    pub fn contains(&self, identifier: &str) -> bool {
        self.constructors.contains_key(identifier)
    }

    pub fn len(&self) -> usize {
        self.constructors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.constructors.is_empty()
    }
}

impl fmt::Debug for BucketRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut ids: Vec<_> = self.constructors.keys().collect();
        ids.sort();
        f.debug_struct("BucketRegistry")
            .field("constructors", &ids)
            .field("sql_scripts", &self.sql_scripts)
            .finish()
    }
}

/// Turns candidates into buckets carrying the shared API registry.
#[derive(Debug, Clone)]
pub struct BucketFactory {
    registry: BucketRegistry,
    api: Arc<ApiRegistry>,
}

impl BucketFactory {
    pub fn new(registry: BucketRegistry, api: Arc<ApiRegistry>) -> Self {
        Self { registry, api }
    }

    /// Resolve one candidate. `Ok(None)` means "not a bucket".
    pub fn resolve(&self, candidate: &Candidate) -> CoreResult<Option<Bucket>> {
        let path = &candidate.path;
        let Some(identifier) = bucket_identifier(path) else {
            log::debug!("Invalid bucket: {}", path.display());
            return Ok(None);
        };

        let body: Box<dyn Migration> = if let Some(ctor) = self.registry.constructors.get(&identifier)
        {
            ctor(path)
        } else if self.registry.sql_scripts && path.extension().is_some_and(|e| e == "sql") {
            let sql = std::fs::read_to_string(path).map_err(|e| CoreError::BucketRead {
                path: path.display().to_string(),
                source: e,
            })?;
            Box::new(SqlScript::new(sql))
        } else {
            log::debug!("Invalid bucket: {}", path.display());
            return Ok(None);
        };

        log::debug!("Valid bucket: {} ({identifier})", path.display());
        Ok(Some(Bucket::new(
            candidate.name.clone(),
            path.clone(),
            Arc::clone(&self.api),
            body,
        )))
    }

    /// Resolve every candidate, keeping order and dropping non-buckets.
    pub fn resolve_all(&self, candidates: &[Candidate]) -> CoreResult<Vec<Bucket>> {
        let mut buckets = Vec::with_capacity(candidates.len());
        for candidate in candidates {
            if let Some(bucket) = self.resolve(candidate)? {
                buckets.push(bucket);
            }
        }
        Ok(buckets)
    }
}

#[cfg(test)]
#[path = "factory_test.rs"]
mod tests;
