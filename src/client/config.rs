//! Runtime client configuration
//!
//! A `ClientConfig` is built once and handed to a long-lived client; there is
//! no process-global configuration state. The base URL and token may come
//! from the `KUBEGEN_BASE_URL` / `KUBEGEN_TOKEN` environment variables.

use crate::config::EnvVars;
use crate::error::{KubegenError, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::env;

/// Configuration for the runtime clients
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ClientConfig {
    /// Base URL of the API server, e.g. `https://cluster.example:6443`
    pub base_url: String,
    /// Bearer token attached as `Authorization` header
    pub token: Option<String>,
    /// Custom headers merged into every request
    #[serde(default)]
    pub headers: HashMap<String, String>,
    /// Skip TLS certificate verification
    #[serde(default)]
    pub accept_invalid_certs: bool,
}

impl ClientConfig {
    /// Create a configuration for the given base URL
    pub fn new<S: Into<String>>(base_url: S) -> Self {
        Self {
            base_url: base_url.into(),
            ..Default::default()
        }
    }

    /// Set the bearer token
    pub fn with_token<S: Into<String>>(mut self, token: S) -> Self {
        self.token = Some(token.into());
        self
    }

    /// Add a custom header
    pub fn with_header<K: Into<String>, V: Into<String>>(mut self, name: K, value: V) -> Self {
        self.headers.insert(name.into(), value.into());
        self
    }

    /// Skip TLS certificate verification
    pub fn with_accept_invalid_certs(mut self, accept: bool) -> Self {
        self.accept_invalid_certs = accept;
        self
    }

    /// Load configuration from environment variables. Returns `None` when
    /// `KUBEGEN_BASE_URL` is unset; the token is optional.
    pub fn from_env() -> Option<Self> {
        let base_url = env::var(EnvVars::BASE_URL).ok()?;
        if base_url.trim().is_empty() {
            return None;
        }
        let mut config = Self::new(base_url);
        if let Ok(token) = env::var(EnvVars::TOKEN) {
            if !token.trim().is_empty() {
                config.token = Some(token);
            }
        }
        Some(config)
    }

    /// Validate the configuration. Fails before any network call when the
    /// base URL is missing.
    pub fn validate(&self) -> Result<()> {
        if self.base_url.trim().is_empty() {
            return Err(KubegenError::config(
                "Client is not configured: base_url is required (set it explicitly \
                 or export KUBEGEN_BASE_URL)",
            ));
        }
        Ok(())
    }
}
