//! Kubegen - Kubernetes OpenAPI client generation pipeline and runtime client
//!
//! This crate fetches per-API-group OpenAPI documents from a cluster, merges
//! them into a single specification, and generates typed Rust client crates
//! for two consumer profiles (async tokio and blocking). It also provides the
//! hand-written runtime modules the generated code links against:
//! configuration, request transport, retry middleware, structured error
//! translation, and convenience list wrappers.

pub mod client;
pub mod config;
pub mod error;
pub mod generator;
pub mod pipeline;
pub mod postprocess;
pub mod release;
pub mod spec;
pub mod utils;

pub use config::{PipelineConfig, ClusterConfig};
pub use error::{KubegenError, Result};

/// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Default configuration file name
pub const DEFAULT_CONFIG_FILE: &str = "kubegen.yaml";

/// Default directory for fetched per-group specs
pub const DEFAULT_SPECS_DIR: &str = "specs";

/// Default directory for generated client crates
pub const DEFAULT_OUTPUT_DIR: &str = "generated";

/// Name of the support API-server container removed by `clean-all`
pub const SUPPORT_CONTAINER: &str = "kubegen-apiserver";
