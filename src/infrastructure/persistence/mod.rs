//! Store implementations of the [`UrlRepository`](crate::domain::repositories::UrlRepository) trait.
//!
//! Queries go through SQLx with bound parameters. The backend is picked from
//! `DATABASE_URL` at startup.
//!
//! # Repositories
//!
//! - [`PgUrlRepository`] - PostgreSQL
//! - [`SqliteUrlRepository`] - SQLite, for development and tests
//! - [`TimeoutRepository`] - Bounds the duration of every call

pub mod database;
pub mod pg_url_repository;
pub mod sqlite_url_repository;
pub mod timeout;

pub use database::{connect_postgres, connect_sqlite, migrate_sqlite, open_repository};
pub use pg_url_repository::PgUrlRepository;
pub use sqlite_url_repository::SqliteUrlRepository;
pub use timeout::TimeoutRepository;
