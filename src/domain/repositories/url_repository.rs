//! Repository trait for URL record persistence.

use crate::domain::entities::{NewUrlRecord, UrlPatch, UrlRecord};
use crate::error::AppError;
use async_trait::async_trait;

/// Persistence contract for URL records, keyed by short code.
///
/// Short code uniqueness is enforced here, by the store's unique constraint.
/// Callers may check [`UrlRepository::exists`] first to avoid needless failed
/// inserts, but must still handle [`AppError::Conflict`] from
/// [`UrlRepository::insert`] and [`UrlRepository::update_by_code`].
///
/// # Implementations
///
/// - [`crate::infrastructure::persistence::PgUrlRepository`] - PostgreSQL
/// - [`crate::infrastructure::persistence::SqliteUrlRepository`] - SQLite
/// - [`crate::infrastructure::persistence::TimeoutRepository`] - bounds every call
///   of another implementation
/// - Test mocks available with `cfg(test)`
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UrlRepository: Send + Sync {
    /// Returns true if a record with this short code exists.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on database errors.
    async fn exists(&self, short_code: &str) -> Result<bool, AppError>;

    /// Inserts a new record with `access_count = 0`.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Conflict`] if the short code is already taken,
    /// including when a concurrent insert won the race.
    ///
    /// Returns [`AppError::Internal`] on other database errors.
    async fn insert(&self, new_record: NewUrlRecord) -> Result<UrlRecord, AppError>;

    /// Finds a record by its short code.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on database errors.
    async fn find_by_code(&self, short_code: &str) -> Result<Option<UrlRecord>, AppError>;

    /// Adds one to the access count and refreshes `updated_at`.
    ///
    /// Returns the number of rows affected (0 if the code no longer exists).
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on database errors.
    async fn increment_access_count(&self, short_code: &str) -> Result<u64, AppError>;

    /// Applies a partial update to the record currently holding `short_code`.
    ///
    /// Returns the number of rows affected; 0 means no such record.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Conflict`] if `patch.short_code` belongs to another record.
    /// Returns [`AppError::Internal`] on other database errors.
    async fn update_by_code(&self, short_code: &str, patch: UrlPatch) -> Result<u64, AppError>;

    /// Deletes the record with this short code.
    ///
    /// Returns the number of rows affected; 0 means no such record.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on database errors.
    async fn delete_by_code(&self, short_code: &str) -> Result<u64, AppError>;

    /// Returns the access count for a short code, or `None` if it does not exist.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on database errors.
    async fn count_accesses(&self, short_code: &str) -> Result<Option<i64>, AppError>;

    /// Lists records, newest first.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on database errors.
    async fn list(&self, limit: i64, offset: i64) -> Result<Vec<UrlRecord>, AppError>;

    /// Counts all records.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on database errors.
    async fn count(&self) -> Result<i64, AppError>;

    /// Round-trips to the store to verify connectivity.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] if the store is unreachable.
    async fn ping(&self) -> Result<(), AppError>;
}
