//! Release tooling for generated client crates
//!
//! Version validation and stamping, publish orchestration with a temporary
//! shared-name rename, and workspace cleanup.

pub mod clean;
pub mod publish;
pub mod version;

pub use clean::{clean_generated, clean_all};
pub use publish::Publisher;
pub use version::{artifact_version, build_timestamp, bump_version, git_revision, validate_version};
