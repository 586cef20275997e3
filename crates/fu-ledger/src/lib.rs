//! fu-ledger - DuckDB-backed run ledger for Forgeup
//!
//! Stores one row per bucket execution attempt in `forgeup.bucket_runs` and
//! the diagnostic events attached to each run in `forgeup.bucket_events`.
//! [`LedgerDb`] implements [`fu_core::Ledger`].

pub mod connection;
pub(crate) mod ddl;
pub mod error;
pub mod migration;
mod store;

pub use connection::LedgerDb;
pub use error::{LedgerDbError, LedgerDbResult};
