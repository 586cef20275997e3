//! fu-db - Target database layer for Forgeup
//!
//! This crate provides the DuckDB backend that buckets reach through the
//! `db` entry of the API registry.

pub mod duckdb;
pub mod error;

pub use crate::duckdb::DuckDbBackend;
pub use error::{DbError, DbResult};
