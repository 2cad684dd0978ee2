//! PostgreSQL persistence for devices and device types.
//!
//! Provides the pool helpers used by the binary, row models, repositories,
//! and the sqlx-backed implementations of the collaborator traits declared in
//! `devices_core::device`.

use sqlx::postgres::PgPoolOptions;

pub mod collaborators;
pub mod models;
pub mod repositories;

pub use collaborators::{PgDeviceStore, PgDeviceTypeLookup};

pub type DbPool = sqlx::PgPool;

/// Create a connection pool from a database URL.
pub async fn create_pool(database_url: &str) -> Result<DbPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(20)
        .connect(database_url)
        .await
}

/// Run a trivial query to confirm the database is reachable.
pub async fn health_check(pool: &DbPool) -> Result<(), sqlx::Error> {
    sqlx::query("SELECT 1").execute(pool).await?;
    Ok(())
}

/// Apply all pending migrations from `crates/db/migrations`.
pub async fn run_migrations(pool: &DbPool) -> Result<(), sqlx::migrate::MigrateError> {
    sqlx::migrate!("./migrations").run(pool).await
}
