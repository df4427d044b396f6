//! Handler for short URL redirect.

use axum::{
    extract::{Path, State},
    http::{StatusCode, header},
    response::IntoResponse,
};
use tracing::info;

use crate::error::AppError;
use crate::state::AppState;

/// Redirects a short code to its original URL.
///
/// # Endpoint
///
/// `GET /u/{code}`
///
/// # Request Flow
///
/// 1. Look up the record (malformed codes are rejected without a store call)
/// 2. Hand an access event to the background recorder
/// 3. Return 302 Found with the stored URL in `Location`
///
/// The access count is updated after the response is sent; a failed increment
/// is logged and never affects the redirect.
///
/// # Errors
///
/// Returns 404 Not Found if the short code doesn't exist.
pub async fn redirect_handler(
    Path(code): Path<String>,
    State(state): State<AppState>,
) -> Result<impl IntoResponse, AppError> {
    let record = state.url_service.resolve(&code).await?;

    state.access_recorder.record(&record.short_code);

    info!(short_code = %record.short_code, url = %record.url, "Redirecting");

    Ok((StatusCode::FOUND, [(header::LOCATION, record.url)]))
}
