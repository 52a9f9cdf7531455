//! # Database
//!
//! This crate provides the query access layer for the camping spot booking backend:
//! a bounded PostgreSQL connection pool and a single parameterized `execute` operation.

/// Connection settings loaded from the environment.
pub mod config;
pub use config::*;

/// Pool lifecycle and the PostgreSQL implementation of [`QueryExecutor`].
pub mod database;
pub use database::*;

/// Parameter values, result rows and the executor trait handlers depend on.
pub mod query;
pub use query::*;
