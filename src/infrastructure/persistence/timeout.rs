//! Per-operation time bound for any [`UrlRepository`].

use async_trait::async_trait;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tracing::error;

use crate::domain::entities::{NewUrlRecord, UrlPatch, UrlRecord};
use crate::domain::repositories::UrlRepository;
use crate::error::AppError;

/// Wraps a repository so that no call runs longer than `timeout`.
///
/// An expired call is abandoned and reported as [`AppError::Timeout`]. The
/// statement may still complete on the server.
pub struct TimeoutRepository<R: UrlRepository + ?Sized> {
    inner: Arc<R>,
    timeout: Duration,
}

impl<R: UrlRepository + ?Sized> TimeoutRepository<R> {
    pub fn new(inner: Arc<R>, timeout: Duration) -> Self {
        Self { inner, timeout }
    }

    async fn bounded<T, F>(&self, operation: &'static str, fut: F) -> Result<T, AppError>
    where
        T: Send,
        F: Future<Output = Result<T, AppError>> + Send,
    {
        match tokio::time::timeout(self.timeout, fut).await {
            Ok(result) => result,
            Err(_) => {
                error!(
                    operation,
                    timeout_ms = self.timeout.as_millis() as u64,
                    "Store operation timed out"
                );
                Err(AppError::timeout(operation))
            }
        }
    }
}

#[async_trait]
impl<R: UrlRepository + ?Sized> UrlRepository for TimeoutRepository<R> {
    async fn exists(&self, short_code: &str) -> Result<bool, AppError> {
        self.bounded("exists", self.inner.exists(short_code)).await
    }

    async fn insert(&self, new_record: NewUrlRecord) -> Result<UrlRecord, AppError> {
        self.bounded("insert", self.inner.insert(new_record)).await
    }

    async fn find_by_code(&self, short_code: &str) -> Result<Option<UrlRecord>, AppError> {
        self.bounded("find_by_code", self.inner.find_by_code(short_code))
            .await
    }

    async fn increment_access_count(&self, short_code: &str) -> Result<u64, AppError> {
        self.bounded(
            "increment_access_count",
            self.inner.increment_access_count(short_code),
        )
        .await
    }

    async fn update_by_code(&self, short_code: &str, patch: UrlPatch) -> Result<u64, AppError> {
        self.bounded("update_by_code", self.inner.update_by_code(short_code, patch))
            .await
    }

    async fn delete_by_code(&self, short_code: &str) -> Result<u64, AppError> {
        self.bounded("delete_by_code", self.inner.delete_by_code(short_code))
            .await
    }

    async fn count_accesses(&self, short_code: &str) -> Result<Option<i64>, AppError> {
        self.bounded("count_accesses", self.inner.count_accesses(short_code))
            .await
    }

    async fn list(&self, limit: i64, offset: i64) -> Result<Vec<UrlRecord>, AppError> {
        self.bounded("list", self.inner.list(limit, offset)).await
    }

    async fn count(&self) -> Result<i64, AppError> {
        self.bounded("count", self.inner.count()).await
    }

    async fn ping(&self) -> Result<(), AppError> {
        self.bounded("ping", self.inner.ping()).await
    }
}
