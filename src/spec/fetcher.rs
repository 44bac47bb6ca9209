//! Spec Fetcher
//!
//! Pulls per-API-group OpenAPI documents from the cluster's `/openapi/v3`
//! discovery endpoint and writes one JSON file per group.

use crate::config::ClusterConfig;
use crate::error::{KubegenError, Result};
use crate::utils::sanitize_group_ident;
use serde::Deserialize;
use serde_json::Value;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{debug, info};
use url::Url;

/// Discovery document returned by `GET /openapi/v3`
#[derive(Debug, Deserialize)]
struct DiscoveryDocument {
    paths: BTreeMap<String, DiscoveryEntry>,
}

/// One discovery entry: either a bare relative URL or the Kubernetes
/// `{"serverRelativeURL": "..."}` object form.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum DiscoveryEntry {
    Url(String),
    Object {
        #[serde(rename = "serverRelativeURL")]
        server_relative_url: String,
    },
}

impl DiscoveryEntry {
    /// The relative spec URL for this group
    pub fn relative_url(&self) -> &str {
        match self {
            DiscoveryEntry::Url(url) => url,
            DiscoveryEntry::Object { server_relative_url } => server_relative_url,
        }
    }
}

/// A per-group spec written to disk
#[derive(Debug, Clone)]
pub struct FetchedSpec {
    /// Discovered group path, e.g. `apis/apps/v1`
    pub group: String,
    /// Sanitized identifier, e.g. `apps-v1`
    pub ident: String,
    /// Path of the written JSON file
    pub path: PathBuf,
}

/// Fetches per-group OpenAPI documents from a cluster
pub struct SpecFetcher {
    http: reqwest::Client,
    base_url: Url,
    token: Option<String>,
}

impl SpecFetcher {
    /// Create a fetcher for the given cluster
    pub fn new(cluster: &ClusterConfig) -> Result<Self> {
        let base_url = Url::parse(&cluster.base_url).map_err(|e| {
            KubegenError::config(format!(
                "Invalid cluster base URL '{}': {}",
                cluster.base_url, e
            ))
        })?;

        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(30))
            .danger_accept_invalid_certs(cluster.insecure_skip_tls_verify)
            .user_agent(concat!("kubegen/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(KubegenError::Http)?;

        Ok(Self {
            http,
            base_url,
            token: cluster.token.clone(),
        })
    }

    /// Fetch the discovery document mapping group paths to relative spec URLs
    pub async fn discover(&self) -> Result<BTreeMap<String, DiscoveryEntry>> {
        let url = self.join("/openapi/v3")?;
        debug!(url = %url, "Fetching OpenAPI discovery document");

        let body = self.get(url).await?;
        let doc: DiscoveryDocument = serde_json::from_slice(&body).map_err(|e| {
            KubegenError::discovery(format!("Malformed discovery document: {}", e))
        })?;

        if doc.paths.is_empty() {
            return Err(KubegenError::discovery(
                "Discovery document contains no API groups",
            ));
        }

        info!(groups = doc.paths.len(), "Discovered API groups");
        Ok(doc.paths)
    }

    /// Fetch every discovered group spec and write one JSON file per group
    /// into `specs_dir`. Groups are processed in sorted order.
    pub async fn fetch_all<P: AsRef<Path>>(&self, specs_dir: P) -> Result<Vec<FetchedSpec>> {
        let specs_dir = specs_dir.as_ref();
        std::fs::create_dir_all(specs_dir)?;

        let groups = self.discover().await?;
        let mut fetched = Vec::with_capacity(groups.len());

        for (group, entry) in groups {
            let ident = sanitize_group_ident(&group);
            let url = self.join(entry.relative_url())?;
            debug!(group = %group, url = %url, "Fetching group spec");

            let body = self.get(url).await?;
            let spec: Value = serde_json::from_slice(&body).map_err(|e| {
                KubegenError::discovery(format!("Group '{}' spec is not valid JSON: {}", group, e))
            })?;
            if spec.get("openapi").is_none() {
                return Err(KubegenError::discovery(format!(
                    "Group '{}' spec is missing the 'openapi' field",
                    group
                )));
            }

            let path = specs_dir.join(format!("{}.json", ident));
            std::fs::write(&path, serde_json::to_vec_pretty(&spec)?)?;
            info!(group = %group, file = %path.display(), "Wrote group spec");

            fetched.push(FetchedSpec { group, ident, path });
        }

        Ok(fetched)
    }

    fn join(&self, relative: &str) -> Result<Url> {
        self.base_url.join(relative).map_err(|e| {
            KubegenError::discovery(format!("Invalid relative URL '{}': {}", relative, e))
        })
    }

    async fn get(&self, url: Url) -> Result<Vec<u8>> {
        let mut request = self
            .http
            .get(url.clone())
            .header("Accept", "application/json");
        if let Some(ref token) = self.token {
            request = request.header("Authorization", format!("Bearer {}", token));
        }

        let response = request.send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(KubegenError::transport(
                status.as_u16(),
                format!("GET {} failed", url),
            ));
        }

        Ok(response.bytes().await?.to_vec())
    }
}
