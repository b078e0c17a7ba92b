//! PostgreSQL persistence for the editorial scheduler.
//!
//! - [`models`] holds the row structs and write DTOs.
//! - [`repositories`] holds one zero-sized repo per table.
//! - [`PgEditorialStore`] implements the collaborator traits of
//!   `editoria_core::ports` on top of the repos.

use sqlx::postgres::PgPoolOptions;

pub mod models;
pub mod repositories;
mod store;

pub use store::PgEditorialStore;

pub type DbPool = sqlx::PgPool;

/// Create a connection pool from a database URL.
pub async fn create_pool(database_url: &str) -> Result<DbPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(10)
        .connect(database_url)
        .await
}

/// Round-trip a trivial query to verify the database is reachable.
pub async fn health_check(pool: &DbPool) -> Result<(), sqlx::Error> {
    sqlx::query_scalar::<_, i32>("SELECT 1")
        .fetch_one(pool)
        .await
        .map(|_| ())
}

/// Apply pending migrations from `db/migrations`.
pub async fn run_migrations(pool: &DbPool) -> Result<(), sqlx::migrate::MigrateError> {
    sqlx::migrate!("../../db/migrations").run(pool).await
}
