//! Configuration module for Kubegen
//!
//! This module provides pipeline configuration loading and environment
//! variable integration.

mod config;
mod environment;

// Re-export the main configuration types
pub use config::{ClusterConfig, PipelineConfig, ProfilesConfig, ReleaseConfig};
pub use environment::{EnvVars, EnvironmentOverrides};
