//! Handler for access statistics.

use axum::{
    Json,
    extract::{Path, State},
};

use crate::api::dto::stats::StatsResponse;
use crate::error::AppError;
use crate::state::AppState;

/// Returns how many times a short link has been followed.
///
/// # Endpoint
///
/// `GET /stats/{code}`
///
/// The count is eventually consistent: a redirect answered a moment ago may
/// not be reflected yet.
///
/// # Errors
///
/// Returns 404 Not Found if the short code doesn't exist.
pub async fn stats_handler(
    State(state): State<AppState>,
    Path(code): Path<String>,
) -> Result<Json<StatsResponse>, AppError> {
    let access_count = state.url_service.access_count(&code).await?;

    Ok(Json(StatsResponse {
        short_code: code,
        access_count,
    }))
}
