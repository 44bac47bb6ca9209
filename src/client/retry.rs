//! Retry middleware with exponential backoff
//!
//! Wraps an `HttpTransport` and re-issues failed requests for a configured
//! set of retryable HTTP statuses. Applies only to requests whose URL starts
//! with the configured base and whose path contains an API segment; anything
//! else passes through untouched.

use crate::client::transport::{ApiRequest, ApiResponse, HttpTransport};
use crate::error::{KubegenError, Result};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;
use tokio::time::sleep;
use tracing::{debug, warn};
use url::Url;

/// Retry policy configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetryPolicy {
    /// Maximum total attempts, including the initial request
    pub max_attempts: u32,
    /// Initial delay between attempts (in milliseconds)
    pub initial_delay_ms: u64,
    /// Backoff multiplier for exponential backoff
    pub backoff_multiplier: f64,
    /// Maximum delay between attempts (in milliseconds)
    pub max_delay_ms: u64,
    /// Whether to add jitter to avoid thundering herd
    pub use_jitter: bool,
    /// HTTP statuses that are retried
    pub retryable_statuses: Vec<u16>,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 4,
            initial_delay_ms: 200,
            backoff_multiplier: 2.0,
            max_delay_ms: 10_000,
            use_jitter: false,
            retryable_statuses: vec![408, 429, 500, 502, 503, 504],
        }
    }
}

impl RetryPolicy {
    /// Create a policy with custom attempt and delay settings
    pub fn new(max_attempts: u32, initial_delay_ms: u64, backoff_multiplier: f64) -> Self {
        Self {
            max_attempts,
            initial_delay_ms,
            backoff_multiplier,
            ..Default::default()
        }
    }

    /// Whether the given status is in the retryable set
    pub fn is_retryable_status(&self, status: u16) -> bool {
        self.retryable_statuses.contains(&status)
    }

    /// Calculate the delay before the given retry (0-based retry index)
    pub fn calculate_delay(&self, attempt: u32) -> Duration {
        let base_delay =
            self.initial_delay_ms as f64 * self.backoff_multiplier.powi(attempt as i32);
        let capped_delay = base_delay.min(self.max_delay_ms as f64);

        let final_delay = if self.use_jitter {
            // Up to 25% jitter
            use std::collections::hash_map::DefaultHasher;
            use std::hash::{Hash, Hasher};
            let mut hasher = DefaultHasher::new();
            std::time::SystemTime::now().hash(&mut hasher);
            let jitter = (hasher.finish() % 25) as f64 / 100.0;
            capped_delay * (1.0 + jitter)
        } else {
            capped_delay
        };

        Duration::from_millis(final_delay as u64)
    }
}

/// Whether a URL targets the API surface of the configured server.
///
/// Heuristic: the URL is on the same scheme/host/port as the configured base
/// and its path contains an `/api/` or `/apis/` segment.
pub fn is_api_request(url: &Url, base: &Url) -> bool {
    if url.scheme() != base.scheme()
        || url.host_str() != base.host_str()
        || url.port_or_known_default() != base.port_or_known_default()
    {
        return false;
    }
    let path = url.path();
    path.starts_with("/api/")
        || path.starts_with("/apis/")
        || path.contains("/api/")
        || path.contains("/apis/")
}

/// Transport wrapper re-issuing failed API requests with backoff
pub struct RetryTransport {
    inner: Arc<dyn HttpTransport>,
    policy: RetryPolicy,
    base_url: Url,
}

impl RetryTransport {
    pub fn new(inner: Arc<dyn HttpTransport>, policy: RetryPolicy, base_url: Url) -> Self {
        Self {
            inner,
            policy,
            base_url,
        }
    }
}

#[async_trait]
impl HttpTransport for RetryTransport {
    async fn execute(&self, request: &ApiRequest) -> Result<ApiResponse> {
        if !is_api_request(&request.url, &self.base_url) {
            return self.inner.execute(request).await;
        }

        let max_attempts = self.policy.max_attempts.max(1);
        let mut last_error: Option<KubegenError> = None;

        for attempt in 0..max_attempts {
            match self.inner.execute(request).await {
                Ok(response) => {
                    if response.is_success() || !self.policy.is_retryable_status(response.status) {
                        if attempt > 0 && response.is_success() {
                            debug!(
                                url = %request.url,
                                attempt = attempt + 1,
                                "Request succeeded after retry"
                            );
                        }
                        return Ok(response);
                    }
                    last_error = Some(KubegenError::transport(
                        response.status,
                        format!("{} {} failed", request.method, request.url),
                    ));
                }
                // Network-level failures are retried like retryable statuses
                Err(KubegenError::Http(e)) => {
                    last_error = Some(KubegenError::Http(e));
                }
                Err(other) => return Err(other),
            }

            if attempt + 1 >= max_attempts {
                break;
            }
            let delay = self.policy.calculate_delay(attempt);
            warn!(
                url = %request.url,
                attempt = attempt + 1,
                delay_ms = delay.as_millis(),
                "Request failed, retrying after delay"
            );
            sleep(delay).await;
        }

        Err(last_error.unwrap_or_else(|| {
            KubegenError::transport(0, "Retry middleware exhausted without a response")
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};

    struct SequenceTransport {
        statuses: Vec<u16>,
        calls: AtomicU32,
    }

    impl SequenceTransport {
        fn new(statuses: Vec<u16>) -> Self {
            Self {
                statuses,
                calls: AtomicU32::new(0),
            }
        }
    }

    #[async_trait]
    impl HttpTransport for SequenceTransport {
        async fn execute(&self, _request: &ApiRequest) -> Result<ApiResponse> {
            let index = self.calls.fetch_add(1, Ordering::SeqCst) as usize;
            let status = *self
                .statuses
                .get(index)
                .or_else(|| self.statuses.last())
                .unwrap_or(&200);
            Ok(ApiResponse {
                status,
                body: b"{}".to_vec(),
            })
        }
    }

    fn api_request(url: &str) -> ApiRequest {
        ApiRequest {
            method: reqwest::Method::GET,
            url: Url::parse(url).unwrap(),
            headers: Vec::new(),
            body: None,
        }
    }

    fn fast_policy() -> RetryPolicy {
        RetryPolicy {
            initial_delay_ms: 1,
            max_delay_ms: 5,
            ..Default::default()
        }
    }

    #[test]
    fn test_delay_calculation_doubles() {
        let policy = RetryPolicy::new(3, 1000, 2.0);
        assert_eq!(policy.calculate_delay(0).as_millis(), 1000);
        assert_eq!(policy.calculate_delay(1).as_millis(), 2000);
        assert_eq!(policy.calculate_delay(2).as_millis(), 4000);
    }

    #[test]
    fn test_delay_capped_at_max() {
        let policy = RetryPolicy {
            initial_delay_ms: 1000,
            backoff_multiplier: 10.0,
            max_delay_ms: 3000,
            ..Default::default()
        };
        assert_eq!(policy.calculate_delay(5).as_millis(), 3000);
    }

    #[test]
    fn test_is_api_request_heuristic() {
        let base = Url::parse("https://cluster.local:6443").unwrap();
        let api = Url::parse("https://cluster.local:6443/api/v1/pods").unwrap();
        let apis = Url::parse("https://cluster.local:6443/apis/apps/v1/deployments").unwrap();
        let healthz = Url::parse("https://cluster.local:6443/healthz").unwrap();
        let elsewhere = Url::parse("https://other.host/api/v1/pods").unwrap();

        assert!(is_api_request(&api, &base));
        assert!(is_api_request(&apis, &base));
        assert!(!is_api_request(&healthz, &base));
        assert!(!is_api_request(&elsewhere, &base));
    }

    #[test]
    fn test_is_api_request_rejects_textual_base_extensions() {
        // A different port whose text happens to extend the base is not ours
        let base = Url::parse("https://cluster.local:644").unwrap();
        let other_port = Url::parse("https://cluster.local:6443/api/v1/pods").unwrap();
        assert!(!is_api_request(&other_port, &base));

        // Scheme mismatches are rejected even on the same host
        let http_base = Url::parse("http://cluster.local").unwrap();
        let https_url = Url::parse("https://cluster.local/api/v1/pods").unwrap();
        assert!(!is_api_request(&https_url, &http_base));
    }

    #[tokio::test]
    async fn test_retries_503_until_success() {
        let inner = Arc::new(SequenceTransport::new(vec![503, 503, 503, 200]));
        let base = Url::parse("https://cluster.local").unwrap();
        let transport = RetryTransport::new(inner.clone(), fast_policy(), base);

        let response = transport
            .execute(&api_request("https://cluster.local/api/v1/pods"))
            .await
            .unwrap();

        assert_eq!(response.status, 200);
        assert_eq!(inner.calls.load(Ordering::SeqCst), 4);
    }

    #[tokio::test]
    async fn test_404_is_not_retried() {
        let inner = Arc::new(SequenceTransport::new(vec![404, 200]));
        let base = Url::parse("https://cluster.local").unwrap();
        let transport = RetryTransport::new(inner.clone(), fast_policy(), base);

        let response = transport
            .execute(&api_request("https://cluster.local/api/v1/pods/missing"))
            .await
            .unwrap();

        assert_eq!(response.status, 404);
        assert_eq!(inner.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_exhausted_attempts_surface_last_status() {
        let inner = Arc::new(SequenceTransport::new(vec![503]));
        let base = Url::parse("https://cluster.local").unwrap();
        let transport = RetryTransport::new(inner.clone(), fast_policy(), base);

        let err = transport
            .execute(&api_request("https://cluster.local/api/v1/pods"))
            .await
            .unwrap_err();

        assert_eq!(err.status_code(), Some(503));
        assert_eq!(inner.calls.load(Ordering::SeqCst), 4);
    }

    #[tokio::test]
    async fn test_non_api_paths_bypass_retry() {
        let inner = Arc::new(SequenceTransport::new(vec![503, 200]));
        let base = Url::parse("https://cluster.local").unwrap();
        let transport = RetryTransport::new(inner.clone(), fast_policy(), base);

        let response = transport
            .execute(&api_request("https://cluster.local/healthz"))
            .await
            .unwrap();

        assert_eq!(response.status, 503);
        assert_eq!(inner.calls.load(Ordering::SeqCst), 1);
    }
}
