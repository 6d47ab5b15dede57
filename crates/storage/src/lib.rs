//! Storage layer for onyx-ext.
//!
//! PostgreSQL via sqlx: projects, folders, trash, workspace access control
//! and feature flags. Schema migrations run at startup.

pub mod error;
mod pg_migrations;
mod pg_storage;
pub mod traits;

pub use error::StorageError;
pub use pg_migrations::run_pg_migrations;
pub use pg_storage::PgStorage;
