//! OpenAPI spec handling for Kubegen
//!
//! Fetches per-API-group documents from a cluster discovery endpoint, merges
//! them into a single specification, and extracts the operation records that
//! drive generated documentation.

pub mod fetcher;
pub mod merger;
pub mod operations;

pub use fetcher::{DiscoveryEntry, FetchedSpec, SpecFetcher};
pub use merger::{load_spec_dir, merge_specs, Collision, CollisionKind, MergeReport};
pub use operations::{extract_operations, OperationRecord, ParameterRecord};
