//! Core domain entities.
//!
//! The service has a single entity, [`UrlRecord`], with companion structs for
//! creation ([`NewUrlRecord`]) and partial updates ([`UrlPatch`]).

pub mod url_record;

pub use url_record::{NewUrlRecord, UrlPatch, UrlRecord};
