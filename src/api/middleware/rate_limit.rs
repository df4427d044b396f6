//! Per-client rate limiting using the token bucket algorithm.

use governor::clock::QuantaInstant;
use governor::middleware::NoOpMiddleware;
use std::sync::Arc;
use tower_governor::{
    GovernorLayer, governor::GovernorConfigBuilder, key_extractor::PeerIpKeyExtractor,
};

/// Rate limiter keyed by peer IP.
pub type RateLimitLayer =
    GovernorLayer<PeerIpKeyExtractor, NoOpMiddleware<QuantaInstant>, axum::body::Body>;

/// Creates a rate limiter allowing `per_second` sustained requests per client
/// IP with a burst of twice that.
///
/// Returns `None` when `per_second` is zero, which disables rate limiting.
/// Requests exceeding the limit receive `429 Too Many Requests`.
///
/// The peer address comes from `ConnectInfo<SocketAddr>`, so the router must
/// be served with `into_make_service_with_connect_info`.
///
/// # Example
///
/// ```rust,ignore
/// let mut router = Router::new().route("/shorten", post(shorten_handler));
/// if let Some(limiter) = rate_limit::layer(100) {
///     router = router.layer(limiter);
/// }
/// ```
pub fn layer(per_second: u64) -> Option<RateLimitLayer> {
    if per_second == 0 {
        return None;
    }

    let replenish_every_ms = (1_000 / per_second).max(1);
    let burst = u32::try_from(per_second.saturating_mul(2)).unwrap_or(u32::MAX);

    let governor_conf = GovernorConfigBuilder::default()
        .per_millisecond(replenish_every_ms)
        .burst_size(burst)
        .finish()?;

    Some(GovernorLayer::new(Arc::new(governor_conf)))
}
