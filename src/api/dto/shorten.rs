//! DTOs for the link shortening endpoint.

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;
use validator::Validate;

/// Short codes are ASCII letters and digits only.
pub(crate) static SHORT_CODE_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-zA-Z0-9]+$").expect("short code pattern is valid"));

/// Request to shorten a URL.
///
/// The URL itself is checked by the service after sanitization, since a bare
/// domain such as `example.com` is accepted.
#[derive(Debug, Deserialize, Validate)]
pub struct ShortenRequest {
    pub url: String,

    /// Optional custom short code.
    #[validate(length(min = 3, max = 20))]
    #[validate(regex(path = "*SHORT_CODE_REGEX"))]
    pub short_code: Option<String>,
}

/// A created or updated short link.
#[derive(Debug, Serialize, Deserialize)]
pub struct ShortUrlResponse {
    pub short_code: String,
    pub short_url: String,
}
