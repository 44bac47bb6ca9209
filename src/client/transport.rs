//! Async request transport
//!
//! Builds full request URLs from the configured base, attaches JSON and auth
//! headers, issues the request and maps non-2xx statuses to errors. The
//! transport seam is the `HttpTransport` trait so retry middleware and tests
//! can wrap or replace the wire implementation.

use crate::client::config::ClientConfig;
use crate::client::interceptor::translate_error_response;
use crate::client::retry::{RetryPolicy, RetryTransport};
use crate::error::{KubegenError, Result};
use async_trait::async_trait;
use reqwest::Method;
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;
use url::Url;

/// Parse a base URL, normalizing the path to end with `/`. `Url::join`
/// treats a non-slash-terminated final segment as a file and would drop it,
/// losing path prefixes like `/k8s/clusters/c-abc`.
pub(crate) fn parse_base_url(raw: &str) -> Result<Url> {
    let mut url = Url::parse(raw)
        .map_err(|e| KubegenError::config(format!("Invalid base URL '{}': {}", raw, e)))?;
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    Ok(url)
}

/// A fully prepared request handed to the transport
#[derive(Debug, Clone)]
pub struct ApiRequest {
    pub method: Method,
    pub url: Url,
    /// Header name/value pairs, auth and custom headers already merged
    pub headers: Vec<(String, String)>,
    /// JSON body, serialized by the transport
    pub body: Option<Value>,
}

/// A raw transport response
#[derive(Debug, Clone)]
pub struct ApiResponse {
    pub status: u16,
    pub body: Vec<u8>,
}

impl ApiResponse {
    /// Whether the status is in the 2xx range
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Transport seam between the client and the wire
#[async_trait]
pub trait HttpTransport: Send + Sync {
    async fn execute(&self, request: &ApiRequest) -> Result<ApiResponse>;
}

/// Default transport backed by a pooled reqwest client
pub struct ReqwestTransport {
    http: reqwest::Client,
}

impl ReqwestTransport {
    pub fn new(config: &ClientConfig) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(30))
            .danger_accept_invalid_certs(config.accept_invalid_certs)
            .user_agent(concat!("kubegen/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(KubegenError::Http)?;
        Ok(Self { http })
    }
}

#[async_trait]
impl HttpTransport for ReqwestTransport {
    async fn execute(&self, request: &ApiRequest) -> Result<ApiResponse> {
        let mut builder = self.http.request(request.method.clone(), request.url.clone());
        for (name, value) in &request.headers {
            builder = builder.header(name, value);
        }
        if let Some(ref body) = request.body {
            builder = builder.body(serde_json::to_vec(body)?);
        }

        let response = builder.send().await?;
        let status = response.status().as_u16();
        let body = response.bytes().await?.to_vec();
        Ok(ApiResponse { status, body })
    }
}

/// Builder for the async client
pub struct ClientBuilder {
    config: ClientConfig,
    retry: Option<RetryPolicy>,
    translate_errors: bool,
    transport: Option<Arc<dyn HttpTransport>>,
}

impl ClientBuilder {
    /// Install the retry middleware with the given policy
    pub fn with_retry(mut self, policy: RetryPolicy) -> Self {
        self.retry = Some(policy);
        self
    }

    /// Install the structured-error translation middleware
    pub fn with_error_translation(mut self, enabled: bool) -> Self {
        self.translate_errors = enabled;
        self
    }

    /// Replace the wire transport (used by tests and custom stacks)
    pub fn with_transport(mut self, transport: Arc<dyn HttpTransport>) -> Self {
        self.transport = Some(transport);
        self
    }

    /// Validate the configuration and build the client
    pub fn build(self) -> Result<Client> {
        self.config.validate()?;
        let base_url = parse_base_url(&self.config.base_url)?;

        let transport: Arc<dyn HttpTransport> = match self.transport {
            Some(transport) => transport,
            None => Arc::new(ReqwestTransport::new(&self.config)?),
        };
        let transport: Arc<dyn HttpTransport> = match self.retry {
            Some(policy) => Arc::new(RetryTransport::new(transport, policy, base_url.clone())),
            None => transport,
        };

        Ok(Client {
            config: self.config,
            base_url,
            transport,
            translate_errors: self.translate_errors,
        })
    }
}

/// Long-lived async client for the Kubernetes API
///
/// Constructed once from an explicit `ClientConfig` and passed by reference;
/// concurrent calls are independent and share the immutable configuration.
pub struct Client {
    config: ClientConfig,
    base_url: Url,
    transport: Arc<dyn HttpTransport>,
    translate_errors: bool,
}

impl std::fmt::Debug for Client {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Client")
            .field("config", &self.config)
            .field("base_url", &self.base_url)
            .field("translate_errors", &self.translate_errors)
            .finish_non_exhaustive()
    }
}

impl Client {
    /// Create a client with the default transport and no middleware
    pub fn new(config: ClientConfig) -> Result<Self> {
        Self::builder(config).build()
    }

    /// Start building a client with middleware options
    pub fn builder(config: ClientConfig) -> ClientBuilder {
        ClientBuilder {
            config,
            retry: None,
            translate_errors: false,
            transport: None,
        }
    }

    /// Create a client from `KUBEGEN_BASE_URL` / `KUBEGEN_TOKEN`
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

    /// Issue a request against the configured API server.
    ///
    /// Builds the full URL from base + relative path, attaches
    /// `Content-Type: application/json`, merges the bearer and custom
    /// headers, percent-encodes query parameters and serializes the body.
    /// Non-2xx statuses yield an error carrying the status code; when error
    /// translation is installed a recognizable Kubernetes `Status` body is
    /// surfaced as a structured API error instead.
    pub async fn request(
        &self,
        method: Method,
        path: &str,
        query: &[(String, String)],
        body: Option<&Value>,
    ) -> Result<Value> {
        let request = self.prepare(method, path, query, body)?;
        debug!(method = %request.method, url = %request.url, "Issuing API request");

        let response = self.transport.execute(&request).await?;
        if !response.is_success() {
            if self.translate_errors {
                return Err(translate_error_response(response.status, &response.body));
            }
            return Err(KubegenError::transport(
                response.status,
                format!("{} {} failed", request.method, request.url),
            ));
        }

        if response.body.is_empty() {
            return Ok(Value::Null);
        }
        Ok(serde_json::from_slice(&response.body)?)
    }

    fn prepare(
        &self,
        method: Method,
        path: &str,
        query: &[(String, String)],
        body: Option<&Value>,
    ) -> Result<ApiRequest> {
        let mut url = self.base_url.join(path.trim_start_matches('/')).map_err(|e| {
            KubegenError::config(format!("Invalid request path '{}': {}", path, e))
        })?;
        if !query.is_empty() {
            url.query_pairs_mut()
                .extend_pairs(query.iter().map(|(k, v)| (k.as_str(), v.as_str())));
        }

        let mut headers = vec![("Content-Type".to_string(), "application/json".to_string())];
        if let Some(ref token) = self.config.token {
            headers.push(("Authorization".to_string(), format!("Bearer {}", token)));
        }
        for (name, value) in &self.config.headers {
            headers.push((name.clone(), value.clone()));
        }

        Ok(ApiRequest {
            method,
            url,
            headers,
            body: body.cloned(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_client() -> Client {
        Client::new(
            ClientConfig::new("https://cluster.local:6443").with_token("secret"),
        )
        .unwrap()
    }

    #[test]
    fn test_prepare_builds_full_url_with_encoded_query() {
        let client = test_client();
        let query = vec![("labelSelector".to_string(), "app=nginx".to_string())];
        let request = client
            .prepare(Method::GET, "/api/v1/namespaces/default/pods", &query, None)
            .unwrap();

        assert_eq!(
            request.url.as_str(),
            "https://cluster.local:6443/api/v1/namespaces/default/pods?labelSelector=app%3Dnginx"
        );
    }

    #[test]
    fn test_prepare_merges_auth_and_custom_headers() {
        let client = Client::new(
            ClientConfig::new("https://cluster.local")
                .with_token("secret")
                .with_header("X-Trace", "1"),
        )
        .unwrap();
        let request = client.prepare(Method::GET, "/api/v1/nodes", &[], None).unwrap();

        let names: Vec<&str> = request.headers.iter().map(|(n, _)| n.as_str()).collect();
        assert!(names.contains(&"Content-Type"));
        assert!(names.contains(&"Authorization"));
        assert!(names.contains(&"X-Trace"));
        let auth = request
            .headers
            .iter()
            .find(|(n, _)| n == "Authorization")
            .unwrap();
        assert_eq!(auth.1, "Bearer secret");
    }

    #[test]
    fn test_unconfigured_client_fails_before_network() {
        let err = Client::new(ClientConfig::default()).unwrap_err();
        assert_eq!(err.category(), "config");
    }

    #[test]
    fn test_prepare_preserves_base_path_prefix() {
        let client = Client::new(ClientConfig::new(
            "https://host.example/k8s/clusters/c-abc",
        ))
        .unwrap();
        let request = client.prepare(Method::GET, "/api/v1/pods", &[], None).unwrap();

        assert_eq!(
            request.url.as_str(),
            "https://host.example/k8s/clusters/c-abc/api/v1/pods"
        );
    }
}
