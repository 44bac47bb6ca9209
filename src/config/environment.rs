//! Environment variable integration for Kubegen configuration

use crate::config::PipelineConfig;
use std::env;
use tracing::debug;

/// Environment variable names used by Kubegen
pub struct EnvVars;

impl EnvVars {
    /// Cluster API server base URL
    pub const BASE_URL: &'static str = "KUBEGEN_BASE_URL";
    /// Static bearer token
    pub const TOKEN: &'static str = "KUBEGEN_TOKEN";
}

/// Environment configuration overrides
///
/// The base URL and token may be supplied via environment; when present they
/// override the file configuration for the pipeline and auto-configure the
/// runtime client (`ClientConfig::from_env`).
#[derive(Debug, Clone, Default)]
pub struct EnvironmentOverrides {
    /// Base URL override
    pub base_url: Option<String>,
    /// Bearer token override
    pub token: Option<String>,
}

impl EnvironmentOverrides {
    /// Load environment variable overrides
    pub fn load() -> Self {
        let mut overrides = EnvironmentOverrides::default();

        if let Ok(base_url) = env::var(EnvVars::BASE_URL) {
            if !base_url.trim().is_empty() {
                debug!("Environment override: {}={}", EnvVars::BASE_URL, base_url);
                overrides.base_url = Some(base_url);
            }
        }

        if let Ok(token) = env::var(EnvVars::TOKEN) {
            if !token.trim().is_empty() {
                debug!("Environment override: {} is set", EnvVars::TOKEN);
                overrides.token = Some(token);
            }
        }

        overrides
    }

    /// Apply environment overrides to a pipeline config
    pub fn apply_to_config(&self, config: &mut PipelineConfig) {
        if let Some(ref base_url) = self.base_url {
            config.cluster.base_url = base_url.clone();
        }
        if let Some(ref token) = self.token {
            config.cluster.token = Some(token.clone());
        }
    }
}
