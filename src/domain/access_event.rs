//! Access event model for asynchronous access counting.

use chrono::{DateTime, Utc};

/// A single successful redirect waiting to be counted.
///
/// Created by the redirect handler and handed to the access worker through a
/// bounded channel, so the redirect response never waits on the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccessEvent {
    pub short_code: String,
    pub requested_at: DateTime<Utc>,
}

impl AccessEvent {
    /// Creates an access event stamped with the current time.
    pub fn new(short_code: impl Into<String>) -> Self {
        Self {
            short_code: short_code.into(),
            requested_at: Utc::now(),
        }
    }
}
