//! Short link creation, resolution, update and deletion.

use std::sync::Arc;

use serde_json::json;
use tracing::{info, warn};

use crate::domain::entities::{NewUrlRecord, UrlPatch, UrlRecord};
use crate::domain::repositories::UrlRepository;
use crate::error::AppError;
use crate::utils::code_generator::CodeGenerator;
use crate::utils::validation::{is_valid_short_code, is_valid_url, sanitize_url};

/// Service orchestrating validation, code generation and persistence.
///
/// Request paths fail fast: only code generation retries on its own.
/// Short code uniqueness is ultimately decided by the store, so every write
/// that can collide maps a store-level duplicate to [`AppError::Conflict`].
pub struct UrlService<R: UrlRepository + ?Sized> {
    repository: Arc<R>,
    generator: CodeGenerator,
    base_url: String,
}

impl<R: UrlRepository + ?Sized> UrlService<R> {
    /// Creates a new URL service.
    pub fn new(repository: Arc<R>, generator: CodeGenerator, base_url: impl Into<String>) -> Self {
        Self {
            repository,
            generator,
            base_url: base_url.into(),
        }
    }

    /// Creates a short link.
    ///
    /// # Flow
    ///
    /// 1. Sanitize, then validate the URL
    /// 2. With a custom code: validate its format and reject it if taken
    /// 3. Without one (or with an empty one): generate a code not yet in the store
    /// 4. Insert; a duplicate at insert time is still a conflict, which closes
    ///    the race the existence check cannot
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Validation`] if the URL or custom code is malformed.
    ///
    /// Returns [`AppError::Conflict`] if the code is already taken.
    ///
    /// Returns [`AppError::Internal`] or [`AppError::Timeout`] on store failures.
    pub async fn create_short_url(
        &self,
        url: &str,
        custom_code: Option<String>,
    ) -> Result<UrlRecord, AppError> {
        let url = sanitize_url(url);
        if !is_valid_url(&url) {
            warn!(url = %url, "Invalid URL provided");
            return Err(AppError::bad_request(
                "Invalid URL format",
                json!({ "url": url }),
            ));
        }

        let short_code = match custom_code.filter(|code| !code.is_empty()) {
            Some(code) => {
                ensure_valid_code(&code)?;

                if self.repository.exists(&code).await? {
                    warn!(short_code = %code, "Short code already exists");
                    return Err(code_taken(&code));
                }

                code
            }
            None => {
                let code = self.generator.generate_unique(self.repository.as_ref()).await?;
                info!(short_code = %code, "Generated new short code");
                code
            }
        };

        let record = self
            .repository
            .insert(NewUrlRecord {
                url,
                short_code: short_code.clone(),
            })
            .await
            .map_err(|e| match e {
                AppError::Conflict { .. } => {
                    warn!(short_code = %short_code, "Short code taken by a concurrent insert");
                    code_taken(&short_code)
                }
                other => other,
            })?;

        info!(short_code = %record.short_code, url = %record.url, "Successfully created short URL");

        Ok(record)
    }

    /// Looks up the record a redirect should follow.
    ///
    /// Does not count the access; the caller dispatches that separately so the
    /// response does not wait on it.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if the code is malformed or unknown.
    pub async fn resolve(&self, short_code: &str) -> Result<UrlRecord, AppError> {
        ensure_known_format(short_code)?;

        self.repository
            .find_by_code(short_code)
            .await?
            .ok_or_else(|| {
                warn!(short_code, "Short code not found");
                code_not_found(short_code)
            })
    }

    /// Updates the record currently holding `short_code`.
    ///
    /// `url` is sanitized and validated like on create; `new_code` must be a
    /// valid short code. At least one of them is required.
    ///
    /// Returns the short code the record holds after the update.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Validation`] if nothing is supplied or a value is malformed.
    ///
    /// Returns [`AppError::NotFound`] if no record holds `short_code`.
    ///
    /// Returns [`AppError::Conflict`] if `new_code` belongs to another record.
    pub async fn update_short_url(
        &self,
        short_code: &str,
        url: Option<String>,
        new_code: Option<String>,
    ) -> Result<String, AppError> {
        ensure_known_format(short_code)?;

        let url = match url {
            Some(raw) => {
                let url = sanitize_url(&raw);
                if !is_valid_url(&url) {
                    warn!(url = %url, "Invalid URL in update request");
                    return Err(AppError::bad_request(
                        "Invalid URL format",
                        json!({ "url": url }),
                    ));
                }
                Some(url)
            }
            None => None,
        };

        if let Some(code) = &new_code {
            ensure_valid_code(code)?;
        }

        let patch = UrlPatch {
            url,
            short_code: new_code,
        };

        if patch.is_empty() {
            return Err(AppError::bad_request(
                "Nothing to update",
                json!({ "expected": ["url", "short_code"] }),
            ));
        }

        let final_code = patch
            .short_code
            .clone()
            .unwrap_or_else(|| short_code.to_string());

        let rows = self
            .repository
            .update_by_code(short_code, patch)
            .await
            .map_err(|e| match e {
                AppError::Conflict { .. } => {
                    warn!(short_code, new_code = %final_code, "Short code already exists");
                    code_taken(&final_code)
                }
                other => other,
            })?;

        if rows == 0 {
            warn!(short_code, "URL not found for update");
            return Err(code_not_found(short_code));
        }

        info!(short_code, new_code = %final_code, "Successfully updated short URL");

        Ok(final_code)
    }

    /// Deletes a short link.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if the code is malformed or unknown.
    pub async fn delete_short_url(&self, short_code: &str) -> Result<(), AppError> {
        ensure_known_format(short_code)?;

        if self.repository.delete_by_code(short_code).await? == 0 {
            warn!(short_code, "Short code not found for deletion");
            return Err(code_not_found(short_code));
        }

        info!(short_code, "Successfully deleted short URL");
        Ok(())
    }

    /// Returns how many times a short link has been followed.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if the code is malformed or unknown.
    pub async fn access_count(&self, short_code: &str) -> Result<i64, AppError> {
        ensure_known_format(short_code)?;

        self.repository
            .count_accesses(short_code)
            .await?
            .ok_or_else(|| {
                warn!(short_code, "Short code not found for stats");
                code_not_found(short_code)
            })
    }

    /// Verifies the store is reachable.
    ///
    /// # Errors
    ///
    /// Propagates the store error.
    pub async fn check_store(&self) -> Result<(), AppError> {
        self.repository.ping().await
    }

    /// Builds the public short URL for a code: `{base_url}/u/{code}`.
    pub fn short_url(&self, short_code: &str) -> String {
        format!("{}/u/{}", self.base_url.trim_end_matches('/'), short_code)
    }
}

fn ensure_valid_code(code: &str) -> Result<(), AppError> {
    if is_valid_short_code(code) {
        return Ok(());
    }

    warn!(short_code = code, "Invalid short code format");
    Err(AppError::bad_request(
        "Short code must be 3-20 alphanumeric characters",
        json!({ "short_code": code, "provided_length": code.len() }),
    ))
}

/// A code that fails format validation can never be stored, so lookups
/// answer 404 without touching the store.
fn ensure_known_format(code: &str) -> Result<(), AppError> {
    if is_valid_short_code(code) {
        Ok(())
    } else {
        Err(code_not_found(code))
    }
}

fn code_not_found(code: &str) -> AppError {
    AppError::not_found("Short code not found", json!({ "short_code": code }))
}

fn code_taken(code: &str) -> AppError {
    AppError::conflict("Short code already exists", json!({ "short_code": code }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::repositories::MockUrlRepository;
    use chrono::Utc;

    fn create_test_record(id: i64, code: &str, url: &str) -> UrlRecord {
        let now = Utc::now();
        UrlRecord::new(id, url.to_string(), code.to_string(), 0, now, now)
    }

    fn service(repo: MockUrlRepository) -> UrlService<MockUrlRepository> {
        UrlService::new(
            Arc::new(repo),
            CodeGenerator::default(),
            "http://localhost:8080/",
        )
    }

    fn duplicate() -> AppError {
        AppError::conflict("Short code already exists", json!({ "constraint": null }))
    }

    #[tokio::test]
    async fn test_create_with_generated_code() {
        let mut repo = MockUrlRepository::new();
        repo.expect_exists().times(1).returning(|_| Ok(false));
        repo.expect_insert()
            .withf(|new| new.url == "https://example.com" && new.short_code.len() == 6)
            .times(1)
            .returning(|new| Ok(create_test_record(1, &new.short_code, &new.url)));

        let record = service(repo)
            .create_short_url("https://example.com", None)
            .await
            .unwrap();

        assert_eq!(record.url, "https://example.com");
        assert_eq!(record.short_code.len(), 6);
        assert_eq!(record.access_count, 0);
    }

    #[tokio::test]
    async fn test_create_sanitizes_before_validation() {
        let mut repo = MockUrlRepository::new();
        repo.expect_exists().returning(|_| Ok(false));
        repo.expect_insert()
            .withf(|new| new.url == "http://example.com")
            .times(1)
            .returning(|new| Ok(create_test_record(1, &new.short_code, &new.url)));

        let record = service(repo)
            .create_short_url("  example.com ", None)
            .await
            .unwrap();

        assert_eq!(record.url, "http://example.com");
    }

    #[tokio::test]
    async fn test_create_invalid_url_never_reaches_store() {
        let mut repo = MockUrlRepository::new();
        repo.expect_exists().times(0);
        repo.expect_insert().times(0);

        let result = service(repo).create_short_url("bad url", None).await;

        assert!(matches!(result, Err(AppError::Validation { .. })));
    }

    #[tokio::test]
    async fn test_create_with_custom_code() {
        let mut repo = MockUrlRepository::new();
        repo.expect_exists()
            .withf(|code| code == "mycode")
            .times(1)
            .returning(|_| Ok(false));
        repo.expect_insert()
            .withf(|new| new.short_code == "mycode")
            .times(1)
            .returning(|new| Ok(create_test_record(7, &new.short_code, &new.url)));

        let record = service(repo)
            .create_short_url("http://a.com", Some("mycode".to_string()))
            .await
            .unwrap();

        assert_eq!(record.short_code, "mycode");
    }

    #[tokio::test]
    async fn test_create_empty_custom_code_generates_one() {
        let mut repo = MockUrlRepository::new();
        repo.expect_exists().times(1).returning(|_| Ok(false));
        repo.expect_insert()
            .withf(|new| new.short_code.len() == 6)
            .times(1)
            .returning(|new| Ok(create_test_record(1, &new.short_code, &new.url)));

        let record = service(repo)
            .create_short_url("http://a.com", Some(String::new()))
            .await
            .unwrap();

        assert_eq!(record.short_code.len(), 6);
    }

    #[tokio::test]
    async fn test_create_custom_code_too_short() {
        let mut repo = MockUrlRepository::new();
        repo.expect_exists().times(0);
        repo.expect_insert().times(0);

        let result = service(repo)
            .create_short_url("http://a.com", Some("ab".to_string()))
            .await;

        let err = result.unwrap_err();
        assert!(matches!(err, AppError::Validation { .. }));
        assert!(err.to_string().contains("3-20"));
    }

    #[tokio::test]
    async fn test_create_custom_code_already_exists() {
        let mut repo = MockUrlRepository::new();
        repo.expect_exists().times(1).returning(|_| Ok(true));
        repo.expect_insert().times(0);

        let result = service(repo)
            .create_short_url("http://a.com", Some("taken".to_string()))
            .await;

        assert!(matches!(result, Err(AppError::Conflict { .. })));
    }

    #[tokio::test]
    async fn test_create_conflict_detected_at_insert() {
        let mut repo = MockUrlRepository::new();
        repo.expect_exists().times(1).returning(|_| Ok(false));
        repo.expect_insert().times(1).returning(|_| Err(duplicate()));

        let result = service(repo)
            .create_short_url("http://a.com", Some("racy".to_string()))
            .await;

        assert!(matches!(result, Err(AppError::Conflict { .. })));
    }

    #[tokio::test]
    async fn test_create_propagates_store_failure() {
        let mut repo = MockUrlRepository::new();
        repo.expect_exists().times(1).returning(|_| Ok(false));
        repo.expect_insert()
            .times(1)
            .returning(|_| Err(AppError::timeout("insert")));

        let result = service(repo).create_short_url("http://a.com", None).await;

        assert!(matches!(result, Err(AppError::Timeout { .. })));
    }

    #[tokio::test]
    async fn test_resolve_found() {
        let mut repo = MockUrlRepository::new();
        repo.expect_find_by_code()
            .withf(|code| code == "abc123")
            .times(1)
            .returning(|code| Ok(Some(create_test_record(1, code, "https://example.com"))));

        let record = service(repo).resolve("abc123").await.unwrap();

        assert_eq!(record.url, "https://example.com");
    }

    #[tokio::test]
    async fn test_resolve_not_found() {
        let mut repo = MockUrlRepository::new();
        repo.expect_find_by_code().times(1).returning(|_| Ok(None));

        let result = service(repo).resolve("missing").await;

        assert!(matches!(result, Err(AppError::NotFound { .. })));
    }

    #[tokio::test]
    async fn test_resolve_malformed_code_skips_store() {
        let mut repo = MockUrlRepository::new();
        repo.expect_find_by_code().times(0);

        let result = service(repo).resolve("no-such_code").await;

        assert!(matches!(result, Err(AppError::NotFound { .. })));
    }

    #[tokio::test]
    async fn test_update_url_only() {
        let mut repo = MockUrlRepository::new();
        repo.expect_update_by_code()
            .withf(|code, patch| {
                code == "abc123"
                    && patch.url.as_deref() == Some("http://new.com")
                    && patch.short_code.is_none()
            })
            .times(1)
            .returning(|_, _| Ok(1));

        let code = service(repo)
            .update_short_url("abc123", Some("new.com".to_string()), None)
            .await
            .unwrap();

        assert_eq!(code, "abc123");
    }

    #[tokio::test]
    async fn test_update_short_code() {
        let mut repo = MockUrlRepository::new();
        repo.expect_update_by_code()
            .withf(|_, patch| patch.short_code.as_deref() == Some("fresh1"))
            .times(1)
            .returning(|_, _| Ok(1));

        let code = service(repo)
            .update_short_url("abc123", None, Some("fresh1".to_string()))
            .await
            .unwrap();

        assert_eq!(code, "fresh1");
    }

    #[tokio::test]
    async fn test_update_requires_a_field() {
        let mut repo = MockUrlRepository::new();
        repo.expect_update_by_code().times(0);

        let result = service(repo).update_short_url("abc123", None, None).await;

        assert!(matches!(result, Err(AppError::Validation { .. })));
    }

    #[tokio::test]
    async fn test_update_invalid_new_code() {
        let mut repo = MockUrlRepository::new();
        repo.expect_update_by_code().times(0);

        let result = service(repo)
            .update_short_url("abc123", None, Some("x".to_string()))
            .await;

        assert!(matches!(result, Err(AppError::Validation { .. })));
    }

    #[tokio::test]
    async fn test_update_invalid_url() {
        let mut repo = MockUrlRepository::new();
        repo.expect_update_by_code().times(0);

        let result = service(repo)
            .update_short_url("abc123", Some("not a url".to_string()), None)
            .await;

        assert!(matches!(result, Err(AppError::Validation { .. })));
    }

    #[tokio::test]
    async fn test_update_no_rows_is_not_found() {
        let mut repo = MockUrlRepository::new();
        repo.expect_update_by_code().times(1).returning(|_, _| Ok(0));

        let result = service(repo)
            .update_short_url("missing", Some("http://a.com".to_string()), None)
            .await;

        assert!(matches!(result, Err(AppError::NotFound { .. })));
    }

    #[tokio::test]
    async fn test_update_to_taken_code_is_conflict() {
        let mut repo = MockUrlRepository::new();
        repo.expect_update_by_code()
            .times(1)
            .returning(|_, _| Err(duplicate()));

        let result = service(repo)
            .update_short_url("abc123", None, Some("taken1".to_string()))
            .await;

        let err = result.unwrap_err();
        assert!(matches!(err, AppError::Conflict { .. }));
    }

    #[tokio::test]
    async fn test_delete_success() {
        let mut repo = MockUrlRepository::new();
        repo.expect_delete_by_code().times(1).returning(|_| Ok(1));

        assert!(service(repo).delete_short_url("abc123").await.is_ok());
    }

    #[tokio::test]
    async fn test_delete_missing() {
        let mut repo = MockUrlRepository::new();
        repo.expect_delete_by_code().times(1).returning(|_| Ok(0));

        let result = service(repo).delete_short_url("missing").await;

        assert!(matches!(result, Err(AppError::NotFound { .. })));
    }

    #[tokio::test]
    async fn test_access_count() {
        let mut repo = MockUrlRepository::new();
        repo.expect_count_accesses()
            .times(1)
            .returning(|_| Ok(Some(42)));

        assert_eq!(service(repo).access_count("abc123").await.unwrap(), 42);
    }

    #[tokio::test]
    async fn test_access_count_missing() {
        let mut repo = MockUrlRepository::new();
        repo.expect_count_accesses().times(1).returning(|_| Ok(None));

        let result = service(repo).access_count("missing").await;

        assert!(matches!(result, Err(AppError::NotFound { .. })));
    }

    #[test]
    fn test_short_url_trims_trailing_slash() {
        let svc = service(MockUrlRepository::new());
        assert_eq!(svc.short_url("abc123"), "http://localhost:8080/u/abc123");
    }
}
