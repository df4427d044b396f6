//! Utility functions for short code generation and input validation.
//!
//! - [`code_generator`] - Random and collision-free short code generation
//! - [`validation`] - URL sanitization and URL/short code validation

pub mod code_generator;
pub mod validation;
