//! Data Transfer Objects for API requests and responses.
//!
//! All DTOs use Serde for JSON serialization/deserialization. Request DTOs
//! also derive `Validate` for the checks that can run before the service.

pub mod health;
pub mod shorten;
pub mod stats;
pub mod update_url;
