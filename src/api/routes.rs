//! API route configuration.

use crate::api::handlers::{
    delete_url_handler, health_handler, redirect_handler, shorten_handler, stats_handler,
    update_url_handler,
};
use crate::state::AppState;
use axum::{
    Router,
    routing::{get, post},
};

/// All public routes.
///
/// # Endpoints
///
/// - `POST   /shorten`        - Create a short link
/// - `GET    /u/{code}`       - Redirect to the stored URL
/// - `PUT    /u/{code}`       - Change the URL and/or short code
/// - `DELETE /u/{code}`       - Delete a short link
/// - `GET    /stats/{code}`   - Access count for a short link
/// - `GET    /health`         - Store and access queue health
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/shorten", post(shorten_handler))
        .route(
            "/u/{code}",
            get(redirect_handler)
                .put(update_url_handler)
                .delete(delete_url_handler),
        )
        .route("/stats/{code}", get(stats_handler))
        .route("/health", get(health_handler))
}
