//! Pipeline configuration management for Kubegen

use crate::error::{KubegenError, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

// Default functions for serde
fn default_specs_dir() -> PathBuf {
    PathBuf::from(crate::DEFAULT_SPECS_DIR)
}

fn default_output_dir() -> PathBuf {
    PathBuf::from(crate::DEFAULT_OUTPUT_DIR)
}

fn default_package_name() -> String {
    "kube-client".to_string()
}

fn default_shared_name() -> String {
    "kubernetes-client".to_string()
}

fn default_version() -> String {
    "1.30".to_string()
}

fn default_true() -> bool {
    true
}

/// Cluster connection configuration for the spec fetcher
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClusterConfig {
    /// Base URL of the cluster API server
    pub base_url: String,
    /// Static bearer token for discovery and spec fetches
    pub token: Option<String>,
    /// Skip TLS certificate verification (local test clusters)
    #[serde(default)]
    pub insecure_skip_tls_verify: bool,
}

impl Default for ClusterConfig {
    fn default() -> Self {
        Self {
            base_url: "https://127.0.0.1:6443".to_string(),
            token: None,
            insecure_skip_tls_verify: false,
        }
    }
}

/// Which target profiles the generator produces
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProfilesConfig {
    /// Generate the async tokio client crate
    #[serde(default = "default_true")]
    pub tokio: bool,
    /// Generate the blocking client crate
    #[serde(default = "default_true")]
    pub blocking: bool,
}

impl Default for ProfilesConfig {
    fn default() -> Self {
        Self {
            tokio: true,
            blocking: true,
        }
    }
}

/// Release and publish configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReleaseConfig {
    /// Base package name for generated crates (profile suffix is appended)
    #[serde(default = "default_package_name")]
    pub package_name: String,
    /// Shared public name the manifest is renamed to during publish
    #[serde(default = "default_shared_name")]
    pub shared_name: String,
    /// Target Kubernetes version, MAJOR.MINOR
    #[serde(default = "default_version")]
    pub version: String,
}

impl Default for ReleaseConfig {
    fn default() -> Self {
        Self {
            package_name: default_package_name(),
            shared_name: default_shared_name(),
            version: default_version(),
        }
    }
}

/// Main pipeline configuration structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineConfig {
    /// Cluster connection settings
    #[serde(default)]
    pub cluster: ClusterConfig,
    /// Directory for fetched per-group specs
    #[serde(default = "default_specs_dir")]
    pub specs_dir: PathBuf,
    /// Directory for generated client crates
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,
    /// Target profile selection
    #[serde(default)]
    pub profiles: ProfilesConfig,
    /// Release settings
    #[serde(default)]
    pub release: ReleaseConfig,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            cluster: ClusterConfig::default(),
            specs_dir: default_specs_dir(),
            output_dir: default_output_dir(),
            profiles: ProfilesConfig::default(),
            release: ReleaseConfig::default(),
        }
    }
}

impl PipelineConfig {
    /// Load configuration from a YAML file, falling back to defaults when the
    /// file does not exist. Environment overrides are applied afterwards.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let mut config = if path.exists() {
            let content = std::fs::read_to_string(path).map_err(|e| {
                KubegenError::config(format!(
                    "Failed to read config file '{}': {}",
                    path.display(),
                    e
                ))
            })?;
            serde_yaml::from_str(&content).map_err(|e| {
                KubegenError::config(format!(
                    "Failed to parse config file '{}': {}",
                    path.display(),
                    e
                ))
            })?
        } else {
            tracing::debug!(path = %path.display(), "Config file not found, using defaults");
            Self::default()
        };

        let overrides = super::EnvironmentOverrides::load();
        overrides.apply_to_config(&mut config);
        config.validate()?;
        Ok(config)
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        if self.cluster.base_url.trim().is_empty() {
            return Err(KubegenError::config("cluster.base_url must not be empty"));
        }
        if self.release.package_name.trim().is_empty() {
            return Err(KubegenError::config("release.package_name must not be empty"));
        }
        if !self.profiles.tokio && !self.profiles.blocking {
            return Err(KubegenError::config(
                "at least one target profile must be enabled",
            ));
        }
        Ok(())
    }

    /// Persist the configuration back to disk (used by the version bump)
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let content = serde_yaml::to_string(self)?;
        std::fs::write(path.as_ref(), content).map_err(|e| {
            KubegenError::config(format!(
                "Failed to write config file '{}': {}",
                path.as_ref().display(),
                e
            ))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = PipelineConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.specs_dir, PathBuf::from("specs"));
        assert_eq!(config.output_dir, PathBuf::from("generated"));
    }

    #[test]
    fn test_validate_rejects_empty_base_url() {
        let mut config = PipelineConfig::default();
        config.cluster.base_url = "  ".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_no_profiles() {
        let mut config = PipelineConfig::default();
        config.profiles.tokio = false;
        config.profiles.blocking = false;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_roundtrip_yaml() {
        let config = PipelineConfig::default();
        let yaml = serde_yaml::to_string(&config).unwrap();
        let parsed: PipelineConfig = serde_yaml::from_str(&yaml).unwrap();
        assert_eq!(parsed.release.version, config.release.version);
    }
}
