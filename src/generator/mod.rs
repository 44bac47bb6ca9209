//! Client generation for Kubegen
//!
//! One configuration-driven generator parameterized by a target profile.
//! Each profile run turns the merged OpenAPI document into a client crate:
//! one module per API tag/group, shared model types, and a crate manifest.

pub mod client_generator;
pub mod profile;

pub use client_generator::{ClientGenerator, GeneratedTree};
pub use profile::TargetProfile;
