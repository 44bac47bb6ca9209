//! Error handling module for Kubegen
//!
//! This module provides the error types shared by the generation pipeline and
//! the runtime client.

mod error;

// Re-export the main error types and utilities
pub use error::{KubegenError, Result};
