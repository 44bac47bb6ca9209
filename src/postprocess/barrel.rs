//! Barrel writer
//!
//! Produces the generated crate's `lib.rs`: one `pub mod` per tag module,
//! the models module, and re-exports of the shared runtime modules
//! (configuration, interceptors, convenience wrappers).

use crate::error::Result;
use crate::generator::{GeneratedTree, TargetProfile};
use std::fmt::Write as _;
use std::path::PathBuf;
use tracing::info;

/// Write the barrel `lib.rs` for a generated crate
pub fn write_barrel(profile: &TargetProfile, tree: &GeneratedTree) -> Result<PathBuf> {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "//! Generated Kubernetes client crate ({} profile)",
        profile.name
    );
    out.push_str("// Generated by kubegen. Do not edit by hand.\n\n");

    for module in &tree.modules {
        let _ = writeln!(out, "pub mod {};", module);
    }
    out.push_str("pub mod models;\n");

    out.push_str("\n// Shared runtime modules\n");
    let _ = writeln!(
        out,
        "pub use kubegen::client::{{{}, ClientConfig}};",
        profile.client_type
    );
    out.push_str("pub use kubegen::client::translate_error_response;\n");
    if profile.async_fns {
        out.push_str("pub use kubegen::client::RetryPolicy;\n");
    }
    if profile.reexport_helpers {
        out.push_str("pub use kubegen::client::{\n");
        out.push_str("    list_config_maps, list_deployments, list_events, list_namespaces,\n");
        out.push_str("    list_nodes, list_pods, list_secrets, list_services, ListOptions,\n");
        out.push_str("};\n");
    }

    let path = tree.src_dir.join("lib.rs");
    std::fs::write(&path, out)?;
    info!(file = %path.display(), "Wrote barrel module");
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tree(dir: &std::path::Path, modules: &[&str]) -> GeneratedTree {
        GeneratedTree {
            root: dir.to_path_buf(),
            src_dir: dir.join("src"),
            crate_name: "kube-client-tokio".to_string(),
            modules: modules.iter().map(|m| m.to_string()).collect(),
            files: Vec::new(),
        }
    }

    #[test]
    fn test_tokio_barrel_reexports_helpers() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir_all(dir.path().join("src")).unwrap();
        let tree = tree(dir.path(), &["apps_v1", "core_v1"]);

        let path = write_barrel(&TargetProfile::tokio(), &tree).unwrap();
        let barrel = std::fs::read_to_string(path).unwrap();

        assert!(barrel.contains("pub mod apps_v1;"));
        assert!(barrel.contains("pub mod core_v1;"));
        assert!(barrel.contains("pub mod models;"));
        assert!(barrel.contains("pub use kubegen::client::{Client, ClientConfig};"));
        assert!(barrel.contains("list_pods"));
        assert!(barrel.contains("RetryPolicy"));
    }

    #[test]
    fn test_blocking_barrel_skips_helpers_and_retry() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir_all(dir.path().join("src")).unwrap();
        let tree = tree(dir.path(), &["core_v1"]);

        let path = write_barrel(&TargetProfile::blocking(), &tree).unwrap();
        let barrel = std::fs::read_to_string(path).unwrap();

        assert!(barrel.contains("BlockingClient"));
        assert!(!barrel.contains("list_pods"));
        assert!(!barrel.contains("RetryPolicy"));
    }
}
