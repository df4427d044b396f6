//! Connection pools, migrations and backend selection.

use anyhow::{Context, Result};
use sqlx::postgres::PgPoolOptions;
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions};
use sqlx::{PgPool, SqlitePool};
use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;

use crate::config::Config;
use crate::domain::repositories::UrlRepository;
use crate::infrastructure::persistence::{
    PgUrlRepository, SqliteUrlRepository, TimeoutRepository,
};

/// Connects to the configured store, applies migrations and returns a
/// repository whose every call is bounded by the store timeout.
///
/// # Errors
///
/// Returns an error if the connection or a migration fails.
pub async fn open_repository(config: &Config) -> Result<Arc<dyn UrlRepository>> {
    let repository: Arc<dyn UrlRepository> = if config.is_postgres() {
        let pool = connect_postgres(config).await?;
        tracing::info!("Connected to PostgreSQL");
        Arc::new(PgUrlRepository::new(Arc::new(pool)))
    } else {
        let pool = connect_sqlite(config).await?;
        tracing::info!("Connected to SQLite");
        Arc::new(SqliteUrlRepository::new(Arc::new(pool)))
    };

    Ok(Arc::new(TimeoutRepository::new(
        repository,
        config.store_timeout(),
    )))
}

/// Opens a PostgreSQL pool and brings the schema up to date.
///
/// # Errors
///
/// Returns an error if the connection or a migration fails.
pub async fn connect_postgres(config: &Config) -> Result<PgPool> {
    let pool = PgPoolOptions::new()
        .max_connections(config.db_max_connections)
        .acquire_timeout(Duration::from_secs(config.db_connect_timeout))
        .max_lifetime(Duration::from_secs(config.db_max_lifetime))
        .connect(&config.database_url)
        .await
        .context("Failed to connect to PostgreSQL")?;

    sqlx::migrate!("./migrations/postgres")
        .run(&pool)
        .await
        .context("Failed to run PostgreSQL migrations")?;

    Ok(pool)
}

/// Opens a SQLite pool, creating the database file if needed, and brings the
/// schema up to date.
///
/// An in-memory database lives inside a single connection, so such a pool is
/// limited to one connection that is never recycled.
///
/// # Errors
///
/// Returns an error if the URL is malformed, the connection fails or a
/// migration fails.
pub async fn connect_sqlite(config: &Config) -> Result<SqlitePool> {
    let options = SqliteConnectOptions::from_str(&config.database_url)
        .with_context(|| format!("Invalid SQLite URL '{}'", config.database_url))?
        .create_if_missing(true)
        .journal_mode(SqliteJournalMode::Wal)
        .busy_timeout(config.store_timeout());

    let in_memory = config.database_url.contains(":memory:");

    let pool_options = if in_memory {
        SqlitePoolOptions::new()
            .max_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
    } else {
        SqlitePoolOptions::new()
            .max_connections(config.db_max_connections)
            .max_lifetime(Duration::from_secs(config.db_max_lifetime))
    };

    let pool = pool_options
        .acquire_timeout(Duration::from_secs(config.db_connect_timeout))
        .connect_with(options)
        .await
        .context("Failed to open SQLite database")?;

    migrate_sqlite(&pool).await?;

    Ok(pool)
}

/// Applies the SQLite migrations to an existing pool.
///
/// # Errors
///
/// Returns an error if a migration fails.
pub async fn migrate_sqlite(pool: &SqlitePool) -> Result<()> {
    sqlx::migrate!("./migrations/sqlite")
        .run(pool)
        .await
        .context("Failed to run SQLite migrations")?;

    Ok(())
}
