//! HTTP middleware for request processing and protection.
//!
//! Provides observability, rate limiting, CORS and response hardening.

pub mod cors;
pub mod rate_limit;
pub mod security_headers;
pub mod tracing;
