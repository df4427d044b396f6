//! Input validation and sanitization for URLs and short codes.
//!
//! All functions here are pure. On create, [`sanitize_url`] must run before
//! [`is_valid_url`]: a bare domain only becomes valid once a scheme has been
//! prepended.

use url::Url;

/// Shortest accepted short code.
pub const MIN_CODE_LENGTH: usize = 3;

/// Longest accepted short code.
pub const MAX_CODE_LENGTH: usize = 20;

/// Returns true if `input` is an absolute `http`/`https` URL with a host.
///
/// Empty strings and strings containing any whitespace are rejected.
/// Parse failures yield `false`.
///
/// # Examples
///
/// ```ignore
/// assert!(is_valid_url("https://example.com/path?q=1"));
/// assert!(!is_valid_url("example.com"));        // no scheme
/// assert!(!is_valid_url("ftp://example.com"));  // wrong scheme
/// assert!(!is_valid_url("http://bad url.com")); // whitespace
/// ```
pub fn is_valid_url(input: &str) -> bool {
    if input.is_empty() || input.chars().any(char::is_whitespace) {
        return false;
    }

    let Ok(url) = Url::parse(input) else {
        return false;
    };

    matches!(url.scheme(), "http" | "https") && url.host_str().is_some_and(|h| !h.is_empty())
}

/// Returns true if `code` is 3-20 ASCII alphanumeric characters.
///
/// Hyphens, underscores and percent-encoded characters are rejected.
pub fn is_valid_short_code(code: &str) -> bool {
    (MIN_CODE_LENGTH..=MAX_CODE_LENGTH).contains(&code.len())
        && code.bytes().all(|b| b.is_ascii_alphanumeric())
}

/// Trims surrounding whitespace and prepends `http://` when no
/// `http://`/`https://` prefix is present.
///
/// # Examples
///
/// ```ignore
/// assert_eq!(sanitize_url("example.com"), "http://example.com");
/// assert_eq!(sanitize_url(" http://x.com "), "http://x.com");
/// ```
pub fn sanitize_url(input: &str) -> String {
    let trimmed = input.trim();

    if has_http_scheme(trimmed) {
        trimmed.to_string()
    } else {
        format!("http://{trimmed}")
    }
}

fn has_http_scheme(s: &str) -> bool {
    let lower = s.get(..8).unwrap_or(s).to_ascii_lowercase();
    lower.starts_with("http://") || lower.starts_with("https://")
}
