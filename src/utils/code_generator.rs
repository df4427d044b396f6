//! Short code generation.
//!
//! Codes are drawn uniformly from the 62-symbol alphabet `[a-zA-Z0-9]` using
//! the thread-local generator from `rand`, which is seeded from the OS once
//! per thread rather than per call.

use rand::Rng;
use rand::distr::Alphanumeric;
use serde_json::json;
use tracing::{debug, warn};

use crate::domain::repositories::UrlRepository;
use crate::error::AppError;
use crate::utils::validation::{MAX_CODE_LENGTH, MIN_CODE_LENGTH};

/// Default length of generated codes.
pub const DEFAULT_CODE_LENGTH: usize = 6;

/// Default number of candidates tried at one length before growing it.
pub const DEFAULT_MAX_ATTEMPTS: usize = 10;

/// Generates a random alphanumeric code of exactly `length` characters.
///
/// # Examples
///
/// ```ignore
/// let code = generate_code(6);
/// assert_eq!(code.len(), 6);
/// assert!(code.chars().all(|c| c.is_ascii_alphanumeric()));
/// ```
pub fn generate_code(length: usize) -> String {
    rand::rng()
        .sample_iter(Alphanumeric)
        .take(length)
        .map(char::from)
        .collect()
}

/// Finds short codes that are not yet taken in the store.
#[derive(Debug, Clone, Copy)]
pub struct CodeGenerator {
    initial_length: usize,
    max_attempts: usize,
}

impl CodeGenerator {
    /// Creates a generator starting at `initial_length`, clamped to the valid
    /// short code range.
    pub fn new(initial_length: usize, max_attempts: usize) -> Self {
        Self {
            initial_length: initial_length.clamp(MIN_CODE_LENGTH, MAX_CODE_LENGTH),
            max_attempts: max_attempts.max(1),
        }
    }

    pub fn initial_length(&self) -> usize {
        self.initial_length
    }

    /// Generates a code that did not exist at the time of the check.
    ///
    /// Tries `max_attempts` candidates per length, then grows the length by one,
    /// up to [`MAX_CODE_LENGTH`]. A store error consumes an attempt the same way
    /// a collision does.
    ///
    /// The result is only a hint: a concurrent writer can still take the code
    /// before it is inserted, so the insert must handle [`AppError::Conflict`].
    ///
    /// # Errors
    ///
    /// Returns the last store error if every attempt at a length failed without
    /// observing a single collision, since a longer code would not help.
    ///
    /// Returns [`AppError::Internal`] if all lengths are exhausted.
    pub async fn generate_unique<R>(&self, repository: &R) -> Result<String, AppError>
    where
        R: UrlRepository + ?Sized,
    {
        for length in self.initial_length..=MAX_CODE_LENGTH {
            let mut collisions = 0usize;
            let mut last_error = None;

            for attempt in 1..=self.max_attempts {
                let candidate = generate_code(length);

                match repository.exists(&candidate).await {
                    Ok(false) => return Ok(candidate),
                    Ok(true) => {
                        collisions += 1;
                        debug!(length, attempt, short_code = %candidate, "Short code collision");
                    }
                    Err(e) => {
                        warn!(length, attempt, error = %e, "Existence check failed during code generation");
                        last_error = Some(e);
                    }
                }
            }

            if collisions == 0
                && let Some(e) = last_error
            {
                return Err(e);
            }

            warn!(
                length,
                attempts = self.max_attempts,
                "No free short code found, growing length"
            );
        }

        Err(AppError::internal(
            "Failed to generate unique code",
            json!({ "reason": "Too many collisions" }),
        ))
    }
}

impl Default for CodeGenerator {
    fn default() -> Self {
        Self::new(DEFAULT_CODE_LENGTH, DEFAULT_MAX_ATTEMPTS)
    }
}
