//! Top-level router configuration.
//!
//! # Route Structure
//!
//! - `POST /shorten`                - Create a short link
//! - `GET|PUT|DELETE /u/{code}`     - Redirect, update, delete
//! - `GET  /stats/{code}`           - Access count
//! - `GET  /health`                 - Health check: store, access queue
//!
//! # Middleware
//!
//! From outermost to innermost:
//!
//! - **Path normalization** - Trailing slash handling
//! - **Tracing** - Structured request/response logging
//! - **CORS** - Any origin
//! - **Security headers** - `nosniff`, frame denial, XSS filter, HSTS
//! - **Rate limiting** - Per-IP token bucket, optional

use crate::api;
use crate::api::middleware::{cors, rate_limit, security_headers, tracing};
use crate::state::AppState;
use axum::Router;
use tower::Layer;
use tower_http::normalize_path::{NormalizePath, NormalizePathLayer};

/// Constructs the application router with all routes and middleware.
///
/// # Arguments
///
/// - `state` - shared application state injected into all handlers
/// - `rate_limit_per_second` - sustained requests per client IP; `0` disables
///   rate limiting. When enabled the router must be served with connect info.
pub fn app_router(state: AppState, rate_limit_per_second: u64) -> NormalizePath<Router> {
    let mut router = api::routes::routes().with_state(state);

    if let Some(limiter) = rate_limit::layer(rate_limit_per_second) {
        router = router.layer(limiter);
    }

    let router = security_headers::apply(router)
        .layer(cors::layer())
        .layer(tracing::layer());

    NormalizePathLayer::trim_trailing_slash().layer(router)
}
