//! Convenience list wrappers
//!
//! A fixed set of higher-level helpers forwarding to the low-level request
//! call with a simplified parameter set: namespace plus label/field selector
//! and pagination. Re-exported by the tokio-profile barrel.

use crate::client::transport::Client;
use crate::error::Result;
use reqwest::Method;
use serde_json::Value;

/// Selector and pagination options for list calls
#[derive(Debug, Clone, Default)]
pub struct ListOptions {
    /// Label selector, e.g. `app=nginx`
    pub label_selector: Option<String>,
    /// Field selector, e.g. `status.phase=Running`
    pub field_selector: Option<String>,
    /// Maximum number of items per page
    pub limit: Option<u32>,
    /// Continuation token from a previous paged response
    pub continue_token: Option<String>,
}

impl ListOptions {
    /// Convert to query parameters. Percent-encoding happens when the URL is
    /// built, so values are passed through verbatim here.
    pub fn to_query(&self) -> Vec<(String, String)> {
        let mut query = Vec::new();
        if let Some(ref selector) = self.label_selector {
            query.push(("labelSelector".to_string(), selector.clone()));
        }
        if let Some(ref selector) = self.field_selector {
            query.push(("fieldSelector".to_string(), selector.clone()));
        }
        if let Some(limit) = self.limit {
            query.push(("limit".to_string(), limit.to_string()));
        }
        if let Some(ref token) = self.continue_token {
            query.push(("continue".to_string(), token.clone()));
        }
        query
    }
}

async fn list_namespaced(
    client: &Client,
    api_base: &str,
    plural: &str,
    namespace: &str,
    options: &ListOptions,
) -> Result<Value> {
    let path = format!("{}/namespaces/{}/{}", api_base, namespace, plural);
    client
        .request(Method::GET, &path, &options.to_query(), None)
        .await
}

async fn list_cluster(
    client: &Client,
    api_base: &str,
    plural: &str,
    options: &ListOptions,
) -> Result<Value> {
    let path = format!("{}/{}", api_base, plural);
    client
        .request(Method::GET, &path, &options.to_query(), None)
        .await
}

/// List pods in a namespace
pub async fn list_pods(client: &Client, namespace: &str, options: &ListOptions) -> Result<Value> {
    list_namespaced(client, "/api/v1", "pods", namespace, options).await
}

/// List services in a namespace
pub async fn list_services(
    client: &Client,
    namespace: &str,
    options: &ListOptions,
) -> Result<Value> {
    list_namespaced(client, "/api/v1", "services", namespace, options).await
}

/// List config maps in a namespace
pub async fn list_config_maps(
    client: &Client,
    namespace: &str,
    options: &ListOptions,
) -> Result<Value> {
    list_namespaced(client, "/api/v1", "configmaps", namespace, options).await
}

/// List secrets in a namespace
pub async fn list_secrets(
    client: &Client,
    namespace: &str,
    options: &ListOptions,
) -> Result<Value> {
    list_namespaced(client, "/api/v1", "secrets", namespace, options).await
}

/// List events in a namespace
pub async fn list_events(
    client: &Client,
    namespace: &str,
    options: &ListOptions,
) -> Result<Value> {
    list_namespaced(client, "/api/v1", "events", namespace, options).await
}

/// List deployments in a namespace
pub async fn list_deployments(
    client: &Client,
    namespace: &str,
    options: &ListOptions,
) -> Result<Value> {
    list_namespaced(client, "/apis/apps/v1", "deployments", namespace, options).await
}

/// List all namespaces
pub async fn list_namespaces(client: &Client, options: &ListOptions) -> Result<Value> {
    list_cluster(client, "/api/v1", "namespaces", options).await
}

/// List all nodes
pub async fn list_nodes(client: &Client, options: &ListOptions) -> Result<Value> {
    list_cluster(client, "/api/v1", "nodes", options).await
}
