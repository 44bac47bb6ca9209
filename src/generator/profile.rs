//! Target framework profiles
//!
//! The generator is a single pipeline parameterized by a profile: the profile
//! selects the client flavor injected into generated signatures, the crate
//! name suffix, and whether the barrel re-exports the convenience wrappers.

use serde::{Deserialize, Serialize};

/// A consumer profile for generated clients
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TargetProfile {
    /// Profile name, embedded in published version strings
    pub name: String,
    /// Whether generated functions are async
    pub async_fns: bool,
    /// Client type injected into generated signatures
    pub client_type: String,
    /// Path the generated modules import the client from
    pub client_import: String,
    /// Whether the barrel re-exports the convenience wrappers
    pub reexport_helpers: bool,
}

impl TargetProfile {
    /// The async tokio profile
    pub fn tokio() -> Self {
        Self {
            name: "tokio".to_string(),
            async_fns: true,
            client_type: "Client".to_string(),
            client_import: "kubegen::client::Client".to_string(),
            reexport_helpers: true,
        }
    }

    /// The blocking profile
    pub fn blocking() -> Self {
        Self {
            name: "blocking".to_string(),
            async_fns: false,
            client_type: "BlockingClient".to_string(),
            client_import: "kubegen::client::BlockingClient".to_string(),
            reexport_helpers: false,
        }
    }

    /// Crate name for this profile, e.g. `kube-client-tokio`
    pub fn crate_name(&self, base: &str) -> String {
        format!("{}-{}", base, self.name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_profile_crate_names() {
        assert_eq!(TargetProfile::tokio().crate_name("kube-client"), "kube-client-tokio");
        assert_eq!(
            TargetProfile::blocking().crate_name("kube-client"),
            "kube-client-blocking"
        );
    }

    #[test]
    fn test_only_tokio_reexports_helpers() {
        assert!(TargetProfile::tokio().reexport_helpers);
        assert!(!TargetProfile::blocking().reexport_helpers);
    }
}
