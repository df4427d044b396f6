//! HTTP server initialization and runtime setup.
//!
//! Handles store connection, worker spawning, and Axum server lifecycle.

use crate::application::services::UrlService;
use crate::config::Config;
use crate::domain::access_worker::spawn_access_worker;
use crate::infrastructure::persistence::open_repository;
use crate::routes::app_router;
use crate::state::AppState;
use crate::utils::code_generator::CodeGenerator;

use anyhow::{Context, Result};
use axum::ServiceExt;
use axum::extract::Request;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tracing::{error, info, warn};

/// Time allowed for queued access increments to land after the server stops.
const WORKER_DRAIN_TIMEOUT: Duration = Duration::from_secs(10);

/// Runs the HTTP server with the given configuration.
///
/// Initializes:
/// - Store connection pool (PostgreSQL or SQLite) and migrations
/// - Background access worker
/// - Axum HTTP server with graceful shutdown
///
/// # Errors
///
/// Returns an error if:
/// - Database connection or migration fails
/// - Server bind fails
/// - Server runtime error occurs
pub async fn run(config: Config) -> Result<()> {
    let repository = open_repository(&config).await?;

    let (access_recorder, worker) = spawn_access_worker(
        repository.clone(),
        config.access_queue_capacity,
        config.access_worker_concurrency,
    );
    info!(
        concurrency = config.access_worker_concurrency,
        "Access worker started"
    );

    let generator = CodeGenerator::new(config.code_length, config.code_max_attempts);
    let url_service = Arc::new(UrlService::new(repository, generator, &config.base_url));
    let state = AppState::new(url_service, access_recorder, &config.environment);

    let app = app_router(state, config.rate_limit_per_second);

    let addr: SocketAddr = config
        .listen_addr
        .parse()
        .with_context(|| format!("Invalid listen address '{}'", config.listen_addr))?;
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;
    info!("Listening on http://{addr}");

    axum::serve(
        listener,
        ServiceExt::<Request>::into_make_service_with_connect_info::<SocketAddr>(app),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await?;

    info!("HTTP server stopped, draining access queue");

    match tokio::time::timeout(WORKER_DRAIN_TIMEOUT, worker.drain()).await {
        Ok(Ok(())) => info!("Graceful shutdown complete"),
        Ok(Err(e)) => error!(error = %e, "Access worker task failed"),
        Err(_) => warn!("Access worker did not drain in time"),
    }

    Ok(())
}

/// Resolves when the process receives SIGINT (Ctrl+C) or SIGTERM.
async fn shutdown_signal() {
    use tokio::signal;

    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!(error = %e, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => info!("Received Ctrl+C signal"),
        () = terminate => info!("Received SIGTERM signal"),
    }
}
