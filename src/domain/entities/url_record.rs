//! URL record entity: the mapping between a short code and its target URL.

use chrono::{DateTime, Utc};

/// A stored short link.
///
/// `id` is assigned by the store and never changes. `access_count` only grows,
/// and only through the redirect path.
#[derive(Debug, Clone, PartialEq, Eq, sqlx::FromRow)]
pub struct UrlRecord {
    pub id: i64,
    pub url: String,
    pub short_code: String,
    pub access_count: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl UrlRecord {
    /// Creates a new UrlRecord instance.
    pub fn new(
        id: i64,
        url: String,
        short_code: String,
        access_count: i64,
        created_at: DateTime<Utc>,
        updated_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            url,
            short_code,
            access_count,
            created_at,
            updated_at,
        }
    }
}

/// Input data for inserting a new record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewUrlRecord {
    pub url: String,
    pub short_code: String,
}

/// Partial update for an existing record, matched by its current short code.
///
/// `None` fields are left unchanged.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UrlPatch {
    pub url: Option<String>,
    pub short_code: Option<String>,
}

impl UrlPatch {
    /// Returns true if the patch would not change anything.
    pub fn is_empty(&self) -> bool {
        self.url.is_none() && self.short_code.is_none()
    }
}
