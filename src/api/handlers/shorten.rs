//! Handler for link shortening endpoint.

use axum::{Json, extract::State, http::StatusCode};
use validator::Validate;

use crate::api::dto::shorten::{ShortUrlResponse, ShortenRequest};
use crate::error::AppError;
use crate::state::AppState;

/// Creates a short link.
///
/// # Endpoint
///
/// `POST /shorten`
///
/// # Request Body
///
/// ```json
/// {
///   "url": "https://example.com",
///   "short_code": "mylink"   // optional, 3-20 alphanumeric characters
/// }
/// ```
///
/// # Response
///
/// `201 Created`
///
/// ```json
/// {
///   "short_code": "mylink",
///   "short_url": "http://localhost:8080/u/mylink"
/// }
/// ```
///
/// # Errors
///
/// An empty `short_code` is treated as absent.
///
/// Returns 400 Bad Request if the URL or short code is invalid.
/// Returns 409 Conflict if the short code is already taken.
pub async fn shorten_handler(
    State(state): State<AppState>,
    Json(mut payload): Json<ShortenRequest>,
) -> Result<(StatusCode, Json<ShortUrlResponse>), AppError> {
    // An empty code means "generate one".
    payload.short_code = payload.short_code.filter(|code| !code.is_empty());
    payload.validate()?;

    let record = state
        .url_service
        .create_short_url(&payload.url, payload.short_code)
        .await?;

    let short_url = state.url_service.short_url(&record.short_code);

    Ok((
        StatusCode::CREATED,
        Json(ShortUrlResponse {
            short_code: record.short_code,
            short_url,
        }),
    ))
}
