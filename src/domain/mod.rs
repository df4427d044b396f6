//! Domain layer containing business entities and the store contract.
//!
//! # Architecture
//!
//! - [`entities`] - Core business data structures
//! - [`repositories`] - Data access trait definitions
//! - [`access_event`] - Access counting event model
//! - [`access_worker`] - Asynchronous access counting worker
//!
//! # Access Counting Flow
//!
//! 1. HTTP handler resolves a short code and answers with a redirect
//! 2. [`access_event::AccessEvent`] is handed to [`access_worker::AccessRecorder`]
//! 3. [`access_worker::run_access_worker`] applies increments with retry logic
//! 4. The count is persisted via [`repositories::UrlRepository::increment_access_count`]

pub mod access_event;
pub mod access_worker;
pub mod entities;
pub mod repositories;
