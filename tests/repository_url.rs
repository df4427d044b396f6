mod common;

use std::sync::Arc;
use shortcode::domain::entities::{NewUrlRecord, UrlPatch};
use shortcode::domain::repositories::UrlRepository;
use shortcode::error::AppError;
use shortcode::infrastructure::persistence::SqliteUrlRepository;

async fn repo() -> (SqliteUrlRepository, sqlx::SqlitePool) {
    let pool = common::test_pool().await;
    (SqliteUrlRepository::new(Arc::new(pool.clone())), pool)
}

fn new_record(code: &str, url: &str) -> NewUrlRecord {
    NewUrlRecord {
        url: url.to_string(),
        short_code: code.to_string(),
    }
}

#[tokio::test]
async fn test_insert_and_find() {
    let (repo, _pool) = repo().await;

    let created = repo
        .insert(new_record("abc123", "https://example.com"))
        .await
        .unwrap();

    assert_eq!(created.short_code, "abc123");
    assert_eq!(created.url, "https://example.com");
    assert_eq!(created.access_count, 0);
    assert_eq!(created.created_at, created.updated_at);

    let found = repo.find_by_code("abc123").await.unwrap().unwrap();
    assert_eq!(found.id, created.id);
    assert_eq!(found.url, "https://example.com");
}

#[tokio::test]
async fn test_find_by_code_not_found() {
    let (repo, _pool) = repo().await;

    assert!(repo.find_by_code("nothing").await.unwrap().is_none());
}

#[tokio::test]
async fn test_exists() {
    let (repo, _pool) = repo().await;
    repo.insert(new_record("here1", "https://example.com"))
        .await
        .unwrap();

    assert!(repo.exists("here1").await.unwrap());
    assert!(!repo.exists("gone1").await.unwrap());
}

#[tokio::test]
async fn test_insert_duplicate_is_conflict() {
    let (repo, _pool) = repo().await;
    repo.insert(new_record("dup1", "https://one.com"))
        .await
        .unwrap();

    let result = repo.insert(new_record("dup1", "https://two.com")).await;

    assert!(matches!(result, Err(AppError::Conflict { .. })));
}

#[tokio::test]
async fn test_increment_access_count() {
    let (repo, _pool) = repo().await;
    let created = repo
        .insert(new_record("inc1", "https://example.com"))
        .await
        .unwrap();

    assert_eq!(repo.increment_access_count("inc1").await.unwrap(), 1);
    assert_eq!(repo.increment_access_count("inc1").await.unwrap(), 1);

    let found = repo.find_by_code("inc1").await.unwrap().unwrap();
    assert_eq!(found.access_count, 2);
    assert!(found.updated_at >= created.updated_at);
}

#[tokio::test]
async fn test_increment_missing_code() {
    let (repo, _pool) = repo().await;

    assert_eq!(repo.increment_access_count("nope1").await.unwrap(), 0);
}

#[tokio::test]
async fn test_update_url_only() {
    let (repo, _pool) = repo().await;
    repo.insert(new_record("upd1", "https://old.com"))
        .await
        .unwrap();

    let rows = repo
        .update_by_code(
            "upd1",
            UrlPatch {
                url: Some("https://new.com".to_string()),
                short_code: None,
            },
        )
        .await
        .unwrap();

    assert_eq!(rows, 1);
    let found = repo.find_by_code("upd1").await.unwrap().unwrap();
    assert_eq!(found.url, "https://new.com");
}

#[tokio::test]
async fn test_update_short_code_keeps_count() {
    let (repo, _pool) = repo().await;
    repo.insert(new_record("old1", "https://example.com"))
        .await
        .unwrap();
    repo.increment_access_count("old1").await.unwrap();

    let rows = repo
        .update_by_code(
            "old1",
            UrlPatch {
                url: None,
                short_code: Some("new1".to_string()),
            },
        )
        .await
        .unwrap();

    assert_eq!(rows, 1);
    assert!(repo.find_by_code("old1").await.unwrap().is_none());
    let found = repo.find_by_code("new1").await.unwrap().unwrap();
    assert_eq!(found.url, "https://example.com");
    assert_eq!(found.access_count, 1);
}

#[tokio::test]
async fn test_update_to_taken_code_is_conflict() {
    let (repo, _pool) = repo().await;
    repo.insert(new_record("aaa1", "https://a.com")).await.unwrap();
    repo.insert(new_record("bbb1", "https://b.com")).await.unwrap();

    let result = repo
        .update_by_code(
            "bbb1",
            UrlPatch {
                url: None,
                short_code: Some("aaa1".to_string()),
            },
        )
        .await;

    assert!(matches!(result, Err(AppError::Conflict { .. })));
}

#[tokio::test]
async fn test_update_missing_code() {
    let (repo, _pool) = repo().await;

    let rows = repo
        .update_by_code(
            "ghost1",
            UrlPatch {
                url: Some("https://x.com".to_string()),
                short_code: None,
            },
        )
        .await
        .unwrap();

    assert_eq!(rows, 0);
}

#[tokio::test]
async fn test_delete_by_code() {
    let (repo, _pool) = repo().await;
    repo.insert(new_record("del1", "https://example.com"))
        .await
        .unwrap();

    assert_eq!(repo.delete_by_code("del1").await.unwrap(), 1);
    assert_eq!(repo.delete_by_code("del1").await.unwrap(), 0);
    assert!(!repo.exists("del1").await.unwrap());
}

#[tokio::test]
async fn test_count_accesses() {
    let (repo, _pool) = repo().await;
    repo.insert(new_record("cnt1", "https://example.com"))
        .await
        .unwrap();

    assert_eq!(repo.count_accesses("cnt1").await.unwrap(), Some(0));
    repo.increment_access_count("cnt1").await.unwrap();
    assert_eq!(repo.count_accesses("cnt1").await.unwrap(), Some(1));
    assert_eq!(repo.count_accesses("none1").await.unwrap(), None);
}

#[tokio::test]
async fn test_list_and_count() {
    let (repo, _pool) = repo().await;
    for i in 0..5 {
        repo.insert(new_record(&format!("list{i}"), "https://example.com"))
            .await
            .unwrap();
    }

    assert_eq!(repo.count().await.unwrap(), 5);

    let page = repo.list(2, 0).await.unwrap();
    assert_eq!(page.len(), 2);
    assert_eq!(page[0].short_code, "list4");
    assert_eq!(page[1].short_code, "list3");

    let rest = repo.list(10, 2).await.unwrap();
    assert_eq!(rest.len(), 3);
    assert_eq!(rest[2].short_code, "list0");
}

#[tokio::test]
async fn test_ping() {
    let (repo, pool) = repo().await;

    assert!(repo.ping().await.is_ok());

    pool.close().await;
    assert!(matches!(repo.ping().await, Err(AppError::Internal { .. })));
}
