//! Runtime client shims for generated Kubernetes clients
//!
//! Two parallel implementations of one request contract - an async tokio
//! client and a blocking client - sharing the same configuration type. The
//! async flavor supports retry middleware with exponential backoff and
//! structured error translation of Kubernetes `Status` bodies.

pub mod blocking;
pub mod config;
pub mod helpers;
pub mod interceptor;
pub mod retry;
pub mod transport;

pub use blocking::BlockingClient;
pub use config::ClientConfig;
pub use helpers::{
    list_config_maps, list_deployments, list_events, list_namespaces, list_nodes, list_pods,
    list_secrets, list_services, ListOptions,
};
pub use interceptor::translate_error_response;
pub use retry::{RetryPolicy, RetryTransport};
pub use transport::{ApiRequest, ApiResponse, Client, ClientBuilder, HttpTransport};
