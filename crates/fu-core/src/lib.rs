//! fu-core - Core library for Forgeup
//!
//! This crate provides shared types, configuration parsing, bucket
//! discovery and filtering, bucket resolution, the ledger contract, and the
//! pending-set computation used by the runner and the CLI.

pub mod api;
pub mod bucket;
pub mod bucket_name;
pub mod config;
pub mod error;
pub mod factory;
pub mod filter;
pub mod ledger;
pub mod locator;
pub mod pending;
pub mod record;
pub mod script;
pub mod status;

pub use api::{ApiRegistry, TargetService, DB_API};
pub use bucket::{Bucket, BucketContext, BucketEvent, Migration};
pub use bucket_name::BucketName;
pub use config::Config;
pub use error::{
    BucketError, BucketResult, CoreError, CoreResult, LedgerError, LedgerResult, ServiceError,
    ServiceErrorKind,
};
pub use factory::{bucket_identifier, BucketFactory, BucketRegistry};
pub use filter::{PathFilter, PathPattern};
pub use ledger::Ledger;
pub use locator::{BucketLocator, Candidate};
pub use pending::pending_buckets;
pub use record::{format_elapsed, RunId, RunRecord, SubEvent};
pub use script::SqlScript;
pub use status::{EventLevel, RunStatus};
