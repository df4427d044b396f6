//! Handlers for short link management (update, delete).

use axum::{
    Json,
    extract::{Path, State},
};
use validator::Validate;

use crate::api::dto::shorten::ShortUrlResponse;
use crate::api::dto::update_url::{DeleteResponse, UpdateUrlRequest};
use crate::error::AppError;
use crate::state::AppState;

/// Updates the destination URL and/or the short code of a link.
///
/// # Endpoint
///
/// `PUT /u/{code}`
///
/// # Request Body
///
/// At least one field is required.
///
/// ```json
/// {
///   "url": "https://new-destination.com",
///   "short_code": "newcode"
/// }
/// ```
///
/// # Response
///
/// The short code the link holds after the update, and its short URL.
///
/// # Errors
///
/// Returns 400 Bad Request if the body is empty or a field is invalid.
/// Returns 404 Not Found if the link doesn't exist.
/// Returns 409 Conflict if the new short code is already taken.
pub async fn update_url_handler(
    Path(code): Path<String>,
    State(state): State<AppState>,
    Json(payload): Json<UpdateUrlRequest>,
) -> Result<Json<ShortUrlResponse>, AppError> {
    payload.validate()?;

    let short_code = state
        .url_service
        .update_short_url(&code, payload.url, payload.short_code)
        .await?;

    let short_url = state.url_service.short_url(&short_code);

    Ok(Json(ShortUrlResponse {
        short_code,
        short_url,
    }))
}

/// Deletes a short link.
///
/// # Endpoint
///
/// `DELETE /u/{code}`
///
/// # Errors
///
/// Returns 404 Not Found if the link doesn't exist.
pub async fn delete_url_handler(
    Path(code): Path<String>,
    State(state): State<AppState>,
) -> Result<Json<DeleteResponse>, AppError> {
    state.url_service.delete_short_url(&code).await?;

    Ok(Json(DeleteResponse {
        short_code: code,
        deleted: true,
    }))
}
