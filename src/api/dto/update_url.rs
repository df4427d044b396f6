//! DTO for the short link update endpoint.

use serde::{Deserialize, Serialize};
use validator::Validate;

use super::shorten::SHORT_CODE_REGEX;

/// Request body for `PUT /u/{code}`.
///
/// Both fields are optional but at least one must be present. A supplied
/// `url` is sanitized the same way as on creation.
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateUrlRequest {
    pub url: Option<String>,

    /// New short code for this link.
    #[validate(length(min = 3, max = 20))]
    #[validate(regex(path = "*SHORT_CODE_REGEX"))]
    pub short_code: Option<String>,
}

/// Response body for `DELETE /u/{code}`.
#[derive(Debug, Serialize, Deserialize)]
pub struct DeleteResponse {
    pub short_code: String,
    pub deleted: bool,
}
