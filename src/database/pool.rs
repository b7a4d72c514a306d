use std::time::Duration;

use sqlx::{postgres::PgPoolOptions, PgPool};
use thiserror::Error;
use tracing::info;

use crate::config;

/// Errors from pool construction and schema bootstrap
#[derive(Debug, Error)]
pub enum DatabaseError {
    #[error("Missing configuration: {0}")]
    ConfigMissing(&'static str),

    #[error(transparent)]
    Sqlx(#[from] sqlx::Error),
}

/// Build the connection pool from DATABASE_URL.
///
/// The pool is constructed once at startup and handed to every component
/// through `AppState`; nothing in the crate reaches for a global handle.
pub async fn connect() -> Result<PgPool, DatabaseError> {
    let url =
        std::env::var("DATABASE_URL").map_err(|_| DatabaseError::ConfigMissing("DATABASE_URL"))?;

    connect_to(&url).await
}

pub async fn connect_to(url: &str) -> Result<PgPool, DatabaseError> {
    let db_config = &config::config().database;

    let pool = PgPoolOptions::new()
        .max_connections(db_config.max_connections)
        .acquire_timeout(Duration::from_secs(db_config.connection_timeout))
        .connect(url)
        .await?;

    info!("Created database pool");
    Ok(pool)
}

/// Apply sql/schema.sql. Every statement is idempotent, so this is safe to
/// run on every startup and in the test harness.
pub async fn apply_schema(pool: &PgPool) -> Result<(), DatabaseError> {
    let schema = include_str!("../../sql/schema.sql");

    for statement in schema.split(';') {
        let statement = statement.trim();
        if statement.is_empty() || statement.lines().all(|l| l.trim().starts_with("--")) {
            continue;
        }
        sqlx::query(statement).execute(pool).await?;
    }

    info!("Applied database schema");
    Ok(())
}

/// Pings the pool to ensure connectivity
pub async fn health_check(pool: &PgPool) -> Result<(), DatabaseError> {
    sqlx::query("SELECT 1").execute(pool).await?;
    Ok(())
}
