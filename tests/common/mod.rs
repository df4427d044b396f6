#![allow(dead_code)]

use axum::Router;
use axum_test::TestServer;
use chrono::Utc;
use serde_json::Value;
use sqlx::SqlitePool;
use sqlx::sqlite::SqlitePoolOptions;
use std::sync::Arc;
use std::time::Duration;

use shortcode::application::services::UrlService;
use shortcode::domain::access_worker::{AccessWorker, spawn_access_worker};
use shortcode::domain::repositories::UrlRepository;
use shortcode::infrastructure::persistence::{
    SqliteUrlRepository, TimeoutRepository, migrate_sqlite,
};
use shortcode::routes::app_router;
use shortcode::state::AppState;
use shortcode::utils::code_generator::CodeGenerator;

pub const BASE_URL: &str = "http://short.test";

/// Fresh in-memory database with the schema applied.
///
/// The database only lives as long as its single connection, so the pool
/// never recycles it.
pub async fn test_pool() -> SqlitePool {
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .idle_timeout(None)
        .max_lifetime(None)
        .connect("sqlite::memory:")
        .await
        .unwrap();

    migrate_sqlite(&pool).await.unwrap();
    pool
}

pub fn test_repository(pool: SqlitePool) -> Arc<dyn UrlRepository> {
    let sqlite = Arc::new(SqliteUrlRepository::new(Arc::new(pool)));
    Arc::new(TimeoutRepository::new(sqlite, Duration::from_secs(5)))
}

pub fn create_test_state(pool: SqlitePool) -> (AppState, AccessWorker) {
    let repository = test_repository(pool);
    let (recorder, worker) = spawn_access_worker(repository.clone(), 100, 2);

    let url_service = Arc::new(UrlService::new(
        repository,
        CodeGenerator::default(),
        BASE_URL,
    ));

    (AppState::new(url_service, recorder, "test"), worker)
}

/// Full application stack (middleware included) without rate limiting.
pub fn test_server(state: AppState) -> TestServer {
    TestServer::new(Router::new().fallback_service(app_router(state, 0))).unwrap()
}

pub async fn create_test_url(pool: &SqlitePool, code: &str, url: &str) {
    let now = Utc::now();

    sqlx::query(
        "INSERT INTO urls (url, short_code, created_at, updated_at, access_count) \
         VALUES (?, ?, ?, ?, 0)",
    )
    .bind(url)
    .bind(code)
    .bind(now)
    .bind(now)
    .execute(pool)
    .await
    .unwrap();
}

pub async fn access_count(pool: &SqlitePool, code: &str) -> Option<i64> {
    sqlx::query_scalar("SELECT access_count FROM urls WHERE short_code = ?")
        .bind(code)
        .fetch_optional(pool)
        .await
        .unwrap()
}

/// Polls `GET /stats/{code}` until the count reaches `expected`.
///
/// Access counting happens after the redirect is answered, so a count can lag
/// the response that caused it.
pub async fn wait_for_access_count(server: &TestServer, code: &str, expected: i64) -> Value {
    let mut last = Value::Null;

    for _ in 0..100 {
        let response = server.get(&format!("/stats/{code}")).await;
        last = response.json::<Value>();
        if last["access_count"] == expected {
            return last;
        }
        tokio::time::sleep(Duration::from_millis(20)).await;
    }

    panic!("access count for {code} never reached {expected}, last response: {last}");
}
