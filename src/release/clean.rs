//! Workspace cleanup
//!
//! `clean` removes generated output; `clean-all` additionally removes fetched
//! specs and force-removes the support API-server container.

use crate::error::Result;
use std::path::Path;
use std::process::Command;
use tracing::{info, warn};

/// Remove the generated output directory
pub fn clean_generated<P: AsRef<Path>>(output_dir: P) -> Result<()> {
    remove_dir(output_dir.as_ref())
}

/// Remove generated output, fetched specs, and the support container
pub fn clean_all<P: AsRef<Path>>(output_dir: P, specs_dir: P, container: &str) -> Result<()> {
    remove_dir(output_dir.as_ref())?;
    remove_dir(specs_dir.as_ref())?;
    remove_container(container);
    Ok(())
}

fn remove_dir(dir: &Path) -> Result<()> {
    if dir.exists() {
        std::fs::remove_dir_all(dir)?;
        info!(dir = %dir.display(), "Removed directory");
    }
    Ok(())
}

/// Best-effort removal of the support container; a missing docker binary or
/// container is not an error.
fn remove_container(name: &str) {
    match Command::new("docker").args(["rm", "-f", name]).output() {
        Ok(output) if output.status.success() => {
            info!(container = %name, "Removed support container");
        }
        Ok(_) => {
            info!(container = %name, "No support container to remove");
        }
        Err(e) => {
            warn!(container = %name, error = %e, "Could not run docker");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clean_removes_existing_dirs() {
        let dir = tempfile::tempdir().unwrap();
        let output = dir.path().join("generated");
        std::fs::create_dir_all(output.join("tokio/src")).unwrap();

        clean_generated(&output).unwrap();
        assert!(!output.exists());

        // Cleaning an absent directory is a no-op
        clean_generated(&output).unwrap();
    }
}
