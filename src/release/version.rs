//! Version validation and artifact version stamping
//!
//! Published artifact versions embed the target profile, a build timestamp
//! and the short source revision: `<MAJOR.MINOR>.0-<profile>.<ts>.<rev>`.

use crate::config::PipelineConfig;
use crate::error::{KubegenError, Result};
use chrono::Utc;
use once_cell::sync::Lazy;
use regex::Regex;
use std::path::Path;
use std::process::Command;
use tracing::{info, warn};

/// Version arguments must be MAJOR.MINOR
static VERSION_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\d+\.\d+$").expect("Invalid regex pattern"));

/// Validate a MAJOR.MINOR version argument
pub fn validate_version(version: &str) -> Result<()> {
    if VERSION_REGEX.is_match(version) {
        Ok(())
    } else {
        Err(KubegenError::release(format!(
            "Invalid version '{}': expected MAJOR.MINOR (e.g. 1.30)",
            version
        )))
    }
}

/// UTC build timestamp used in artifact versions
pub fn build_timestamp() -> String {
    Utc::now().format("%Y%m%d%H%M%S").to_string()
}

/// Short git revision of the working tree, `unknown` outside a checkout
pub fn git_revision() -> String {
    let output = Command::new("git")
        .args(["rev-parse", "--short", "HEAD"])
        .output();
    match output {
        Ok(output) if output.status.success() => {
            String::from_utf8_lossy(&output.stdout).trim().to_string()
        }
        _ => {
            warn!("Could not determine git revision, using 'unknown'");
            "unknown".to_string()
        }
    }
}

/// Build the full artifact version string for a profile
pub fn artifact_version(kube_version: &str, profile: &str, timestamp: &str, revision: &str) -> Result<String> {
    validate_version(kube_version)?;
    Ok(format!(
        "{}.0-{}.{}.{}",
        kube_version, profile, timestamp, revision
    ))
}

/// Validate and rewrite the release version in the pipeline config file
pub fn bump_version<P: AsRef<Path>>(config_path: P, new_version: &str) -> Result<()> {
    validate_version(new_version)?;
    let mut config = PipelineConfig::load(&config_path)?;
    let old = config.release.version.clone();
    config.release.version = new_version.to_string();
    config.save(&config_path)?;
    info!(from = %old, to = %new_version, "Bumped release version");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_version_accepts_major_minor() {
        assert!(validate_version("1.30").is_ok());
        assert!(validate_version("0.9").is_ok());
        assert!(validate_version("12.345").is_ok());
    }

    #[test]
    fn test_validate_version_rejects_other_shapes() {
        assert!(validate_version("1.30.0").is_err());
        assert!(validate_version("v1.30").is_err());
        assert!(validate_version("1").is_err());
        assert!(validate_version("latest").is_err());
        assert!(validate_version("").is_err());
    }

    #[test]
    fn test_artifact_version_format() {
        let version = artifact_version("1.30", "tokio", "20260826120000", "abc1234").unwrap();
        assert_eq!(version, "1.30.0-tokio.20260826120000.abc1234");
    }

    #[test]
    fn test_artifact_version_validates_input() {
        assert!(artifact_version("1.30.1", "tokio", "t", "r").is_err());
    }

    #[test]
    fn test_bump_version_rewrites_config() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("kubegen.yaml");
        let config = PipelineConfig::default();
        config.save(&path).unwrap();

        bump_version(&path, "1.31").unwrap();
        let reloaded = PipelineConfig::load(&path).unwrap();
        assert_eq!(reloaded.release.version, "1.31");

        assert!(bump_version(&path, "nope").is_err());
    }
}
