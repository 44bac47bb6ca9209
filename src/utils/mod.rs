//! Shared utilities for Kubegen
//!
//! Common helpers used across the pipeline: API-group name sanitization and
//! identifier conversion for generated code.

pub mod name_sanitizer;

pub use name_sanitizer::{module_ident, sanitize_group_ident, snake_case};
