//! Publish orchestration
//!
//! Stamps the generated crate manifest with the artifact version, temporarily
//! renames the package to the shared public name, runs `cargo publish`, and
//! restores the original manifest whether the publish succeeded or failed.

use crate::error::{KubegenError, Result};
use std::path::{Path, PathBuf};
use std::process::Command;
use tracing::{info, warn};

/// Restores the original manifest bytes on drop. Publishing must never leave
/// the renamed manifest behind, even on panic.
struct ManifestGuard {
    path: PathBuf,
    original: String,
    restored: bool,
}

impl ManifestGuard {
    fn restore(&mut self) -> Result<()> {
        if !self.restored {
            std::fs::write(&self.path, &self.original)?;
            self.restored = true;
        }
        Ok(())
    }
}

impl Drop for ManifestGuard {
    fn drop(&mut self) {
        if !self.restored {
            if let Err(e) = std::fs::write(&self.path, &self.original) {
                warn!(
                    path = %self.path.display(),
                    error = %e,
                    "Failed to restore manifest after publish"
                );
            }
        }
    }
}

/// Publishes one generated crate
pub struct Publisher {
    manifest_path: PathBuf,
    shared_name: String,
    dry_run: bool,
}

impl Publisher {
    pub fn new<P: AsRef<Path>>(manifest_path: P, shared_name: String) -> Self {
        Self {
            manifest_path: manifest_path.as_ref().to_path_buf(),
            shared_name,
            dry_run: false,
        }
    }

    /// Run `cargo publish --dry-run` instead of a real publish
    pub fn dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    /// Stamp the manifest and publish. The manifest is restored afterwards
    /// in every case.
    pub fn publish(&self, artifact_version: &str) -> Result<()> {
        let original = std::fs::read_to_string(&self.manifest_path).map_err(|e| {
            KubegenError::release(format!(
                "Cannot read manifest '{}': {}",
                self.manifest_path.display(),
                e
            ))
        })?;

        let stamped = self.stamp(&original, artifact_version)?;
        let mut guard = ManifestGuard {
            path: self.manifest_path.clone(),
            original,
            restored: false,
        };
        std::fs::write(&self.manifest_path, &stamped)?;

        let result = self.run_cargo_publish();
        guard.restore()?;
        result
    }

    /// Rewrite the package name to the shared public name and stamp the
    /// artifact version.
    fn stamp(&self, manifest: &str, artifact_version: &str) -> Result<String> {
        let mut doc: toml::Value = toml::from_str(manifest)
            .map_err(|e| KubegenError::release(format!("Malformed manifest: {}", e)))?;

        let package = doc
            .get_mut("package")
            .and_then(toml::Value::as_table_mut)
            .ok_or_else(|| KubegenError::release("Manifest has no [package] table"))?;
        package.insert(
            "name".to_string(),
            toml::Value::String(self.shared_name.clone()),
        );
        package.insert(
            "version".to_string(),
            toml::Value::String(artifact_version.to_string()),
        );

        toml::to_string(&doc)
            .map_err(|e| KubegenError::release(format!("Cannot serialize manifest: {}", e)))
    }

    fn run_cargo_publish(&self) -> Result<()> {
        let mut command = Command::new("cargo");
        command
            .arg("publish")
            .arg("--allow-dirty")
            .arg("--manifest-path")
            .arg(&self.manifest_path);
        if self.dry_run {
            command.arg("--dry-run");
        }

        info!(
            manifest = %self.manifest_path.display(),
            shared_name = %self.shared_name,
            dry_run = self.dry_run,
            "Publishing generated crate"
        );
        let status = command.status().map_err(|e| {
            KubegenError::release(format!("Failed to launch cargo publish: {}", e))
        })?;
        if !status.success() {
            return Err(KubegenError::release(format!(
                "cargo publish exited with {}",
                status
            )));
        }
        Ok(())
    }
}
