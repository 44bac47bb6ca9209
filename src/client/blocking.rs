//! Blocking request transport
//!
//! The blocking counterpart of the async client: same configuration type,
//! same URL/header/query contract, no middleware support.

use crate::client::config::ClientConfig;
use crate::client::interceptor::translate_error_response;
use crate::client::transport::parse_base_url;
use crate::error::{KubegenError, Result};
use reqwest::Method;
use serde_json::Value;
use std::time::Duration;
use tracing::debug;
use url::Url;

/// Long-lived blocking client for the Kubernetes API
#[derive(Debug)]
pub struct BlockingClient {
    config: ClientConfig,
    base_url: Url,
    http: reqwest::blocking::Client,
    translate_errors: bool,
}

impl BlockingClient {
    /// Create a blocking client from the given configuration
    pub fn new(config: ClientConfig) -> Result<Self> {
        Self::with_error_translation(config, false)
    }

    /// Create a blocking client, optionally translating structured errors
    pub fn with_error_translation(config: ClientConfig, translate_errors: bool) -> Result<Self> {
        config.validate()?;
        let base_url = parse_base_url(&config.base_url)?;
        let http = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(30))
            .danger_accept_invalid_certs(config.accept_invalid_certs)
            .user_agent(concat!("kubegen/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(KubegenError::Http)?;

        Ok(Self {
            config,
            base_url,
            http,
            translate_errors,
        })
    }

    /// Create a blocking client from `KUBEGEN_BASE_URL` / `KUBEGEN_TOKEN`
    pub fn from_env() -> Result<Self> {
        let config = ClientConfig::from_env().ok_or_else(|| {
            KubegenError::config("KUBEGEN_BASE_URL is not set; cannot auto-configure client")
        })?;
        Self::new(config)
    }

    /// The configured base URL
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Issue a request against the configured API server
    pub fn request(
        &self,
        method: Method,
        path: &str,
        query: &[(String, String)],
        body: Option<&Value>,
    ) -> Result<Value> {
        let mut url = self.base_url.join(path.trim_start_matches('/')).map_err(|e| {
            KubegenError::config(format!("Invalid request path '{}': {}", path, e))
        })?;
        if !query.is_empty() {
            url.query_pairs_mut()
                .extend_pairs(query.iter().map(|(k, v)| (k.as_str(), v.as_str())));
        }
        debug!(method = %method, url = %url, "Issuing blocking API request");

        let mut builder = self
            .http
            .request(method.clone(), url.clone())
            .header("Content-Type", "application/json");
        if let Some(ref token) = self.config.token {
            builder = builder.header("Authorization", format!("Bearer {}", token));
        }
        for (name, value) in &self.config.headers {
            builder = builder.header(name, value);
        }
        if let Some(body) = body {
            builder = builder.body(serde_json::to_vec(body)?);
        }

        let response = builder.send()?;
        let status = response.status().as_u16();
        let bytes = response.bytes()?.to_vec();

        if !(200..300).contains(&status) {
            if self.translate_errors {
                return Err(translate_error_response(status, &bytes));
            }
            return Err(KubegenError::transport(
                status,
                format!("{} {} failed", method, url),
            ));
        }

        if bytes.is_empty() {
            return Ok(Value::Null);
        }
        Ok(serde_json::from_slice(&bytes)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unconfigured_blocking_client_fails_before_network() {
        let err = BlockingClient::new(ClientConfig::default()).unwrap_err();
        assert_eq!(err.category(), "config");
    }

    #[test]
    fn test_base_path_prefix_is_preserved() {
        let client = BlockingClient::new(ClientConfig::new(
            "https://host.example/k8s/clusters/c-abc",
        ))
        .unwrap();
        assert_eq!(
            client.base_url().as_str(),
            "https://host.example/k8s/clusters/c-abc/"
        );
    }
}
