//! Host services exposed to bucket bodies.
//!
//! Buckets never see the ledger or the runner. Everything they may call
//! back into is registered by name in an [`ApiRegistry`] that the factory
//! hands to each resolved bucket.

use crate::error::ServiceError;
use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

/// Name under which the target database service is registered.
pub const DB_API: &str = "db";

/// A service that runs statements against the managed system.
///
/// Errors are infrastructure failures: a bucket that propagates one is
/// recorded as ERROR, not FAILURE.
pub trait TargetService: Send + Sync {
    /// Execute one statement, returning the affected row count.
    fn execute(&self, statement: &str) -> Result<usize, ServiceError>;

    /// Execute a script of one or more statements.
    fn execute_batch(&self, sql: &str) -> Result<(), ServiceError>;

    /// Count the rows returned by a query.
    fn query_count(&self, sql: &str) -> Result<usize, ServiceError>;

    /// Check whether a table or view exists (optionally schema-qualified).
    fn relation_exists(&self, name: &str) -> Result<bool, ServiceError>;

    /// Service type identifier for logging.
    fn service_type(&self) -> &'static str;
}

/// Capability name → backing service.
#[derive(Clone, Default)]
pub struct ApiRegistry {
    services: BTreeMap<String, Arc<dyn TargetService>>,
}

impl ApiRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `service` under `name`, replacing any previous entry.
    pub fn register(
        &mut self,
        name: impl Into<String>,
        service: Arc<dyn TargetService>,
    ) -> Option<Arc<dyn TargetService>> {
        self.services.insert(name.into(), service)
    }

    /// Builder-style [`register`](Self::register).
    pub fn with(mut self, name: impl Into<String>, service: Arc<dyn TargetService>) -> Self {
        self.register(name, service);
        self
    }

    pub fn get(&self, name: &str) -> Option<&Arc<dyn TargetService>> {
        self.services.get(name)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.services.keys().map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.services.is_empty()
    }
}

impl fmt::Debug for ApiRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ApiRegistry")
            .field("services", &self.services.keys().collect::<Vec<_>>())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Noop;

    impl TargetService for Noop {
        fn execute(&self, _: &str) -> Result<usize, ServiceError> {
            Ok(0)
        }
        fn execute_batch(&self, _: &str) -> Result<(), ServiceError> {
            Ok(())
        }
        fn query_count(&self, _: &str) -> Result<usize, ServiceError> {
            Ok(0)
        }
        fn relation_exists(&self, _: &str) -> Result<bool, ServiceError> {
            Ok(false)
        }
        fn service_type(&self) -> &'static str {
            "noop"
        }
    }

    #[test]
    fn test_register_and_get() {
        let api = ApiRegistry::new().with(DB_API, Arc::new(Noop));
        assert_eq!(api.get(DB_API).unwrap().service_type(), "noop");
        assert!(api.get("mail").is_none());
        assert_eq!(api.names().collect::<Vec<_>>(), vec!["db"]);
    }

    #[test]
    fn test_register_replaces() {
        let mut api = ApiRegistry::new();
        assert!(api.register(DB_API, Arc::new(Noop)).is_none());
        assert!(api.register(DB_API, Arc::new(Noop)).is_some());
        assert!(!api.is_empty());
    }

    #[test]
    fn test_debug_lists_names_only() {
        let api = ApiRegistry::new().with("db", Arc::new(Noop));
        assert_eq!(format!("{api:?}"), r#"ApiRegistry { services: ["db"] }"#);
    }
}
