//! SQLite implementation of the URL repository.
//!
//! Used for local development and the integration test suite. Timestamps are
//! bound from the application so both backends store the same instants.

use async_trait::async_trait;
use chrono::Utc;
use sqlx::SqlitePool;
use std::sync::Arc;

use crate::domain::entities::{NewUrlRecord, UrlPatch, UrlRecord};
use crate::domain::repositories::UrlRepository;
use crate::error::AppError;

pub struct SqliteUrlRepository {
    pool: Arc<SqlitePool>,
}

impl SqliteUrlRepository {
    pub fn new(pool: Arc<SqlitePool>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UrlRepository for SqliteUrlRepository {
    async fn exists(&self, short_code: &str) -> Result<bool, AppError> {
        let found = sqlx::query_scalar::<_, i64>(
            "SELECT EXISTS(SELECT 1 FROM urls WHERE short_code = ?)",
        )
        .bind(short_code)
        .fetch_one(self.pool.as_ref())
        .await?;

        Ok(found != 0)
    }

    async fn insert(&self, new_record: NewUrlRecord) -> Result<UrlRecord, AppError> {
        let now = Utc::now();

        let record = sqlx::query_as::<_, UrlRecord>(
            r#"
            INSERT INTO urls (url, short_code, created_at, updated_at, access_count)
            VALUES (?, ?, ?, ?, 0)
            RETURNING id, url, short_code, access_count, created_at, updated_at
            "#,
        )
        .bind(&new_record.url)
        .bind(&new_record.short_code)
        .bind(now)
        .bind(now)
        .fetch_one(self.pool.as_ref())
        .await?;

        Ok(record)
    }

    async fn find_by_code(&self, short_code: &str) -> Result<Option<UrlRecord>, AppError> {
        let record = sqlx::query_as::<_, UrlRecord>(
            r#"
            SELECT id, url, short_code, access_count, created_at, updated_at
            FROM urls
            WHERE short_code = ?
            "#,
        )
        .bind(short_code)
        .fetch_optional(self.pool.as_ref())
        .await?;

        Ok(record)
    }

    async fn increment_access_count(&self, short_code: &str) -> Result<u64, AppError> {
        let result = sqlx::query(
            "UPDATE urls SET access_count = access_count + 1, updated_at = ? WHERE short_code = ?",
        )
        .bind(Utc::now())
        .bind(short_code)
        .execute(self.pool.as_ref())
        .await?;

        Ok(result.rows_affected())
    }

    async fn update_by_code(&self, short_code: &str, patch: UrlPatch) -> Result<u64, AppError> {
        let result = sqlx::query(
            r#"
            UPDATE urls
            SET url = COALESCE(?, url),
                short_code = COALESCE(?, short_code),
                updated_at = ?
            WHERE short_code = ?
            "#,
        )
        .bind(patch.url)
        .bind(patch.short_code)
        .bind(Utc::now())
        .bind(short_code)
        .execute(self.pool.as_ref())
        .await?;

        Ok(result.rows_affected())
    }

    async fn delete_by_code(&self, short_code: &str) -> Result<u64, AppError> {
        let result = sqlx::query("DELETE FROM urls WHERE short_code = ?")
            .bind(short_code)
            .execute(self.pool.as_ref())
            .await?;

        Ok(result.rows_affected())
    }

    async fn count_accesses(&self, short_code: &str) -> Result<Option<i64>, AppError> {
        let count = sqlx::query_scalar::<_, i64>("SELECT access_count FROM urls WHERE short_code = ?")
            .bind(short_code)
            .fetch_optional(self.pool.as_ref())
            .await?;

        Ok(count)
    }

    async fn list(&self, limit: i64, offset: i64) -> Result<Vec<UrlRecord>, AppError> {
        let records = sqlx::query_as::<_, UrlRecord>(
            r#"
            SELECT id, url, short_code, access_count, created_at, updated_at
            FROM urls
            ORDER BY created_at DESC, id DESC
            LIMIT ? OFFSET ?
            "#,
        )
        .bind(limit)
        .bind(offset)
        .fetch_all(self.pool.as_ref())
        .await?;

        Ok(records)
    }

    async fn count(&self) -> Result<i64, AppError> {
        let total = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM urls")
            .fetch_one(self.pool.as_ref())
            .await?;

        Ok(total)
    }

    async fn ping(&self) -> Result<(), AppError> {
        sqlx::query("SELECT 1").execute(self.pool.as_ref()).await?;
        Ok(())
    }
}
