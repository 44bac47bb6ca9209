//! Error types and handling for Kubegen

use serde_json::Value;
use thiserror::Error;

/// Result type alias for Kubegen operations
pub type Result<T> = std::result::Result<T, KubegenError>;

/// Main error type for the Kubegen pipeline and runtime client
#[derive(Error, Debug)]
pub enum KubegenError {
    /// Configuration errors (missing or invalid fields)
    #[error("Configuration error: {message}")]
    Config { message: String },

    /// Discovery errors (discovery document missing or malformed)
    #[error("Discovery error: {message}")]
    Discovery { message: String },

    /// Spec merge errors (missing spec directory, empty spec set)
    #[error("Merge error: {message}")]
    Merge { message: String },

    /// Client generation errors
    #[error("Generation error: {message}")]
    Generate { message: String },

    /// Post-processing errors (unfixable lint findings, doc injection)
    #[error("Post-processing error: {message}")]
    PostProcess { message: String },

    /// Release and publish errors
    #[error("Release error: {message}")]
    Release { message: String },

    /// Transport errors (non-2xx HTTP status)
    #[error("HTTP {status}: {message}")]
    Transport { status: u16, message: String },

    /// Structured API errors translated from a Kubernetes Status body
    #[error("API error {status} ({reason}): {message}")]
    Api {
        status: u16,
        reason: String,
        message: String,
        details: Option<Value>,
    },

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization errors
    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),

    /// YAML parsing errors
    #[error("YAML parsing error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// HTTP client errors
    #[error("HTTP client error: {0}")]
    Http(#[from] reqwest::Error),

    /// Generic errors
    #[error("Internal error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl KubegenError {
    /// Create a configuration error
    pub fn config<S: Into<String>>(message: S) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Create a discovery error
    pub fn discovery<S: Into<String>>(message: S) -> Self {
        Self::Discovery {
            message: message.into(),
        }
    }

    /// Create a merge error
    pub fn merge<S: Into<String>>(message: S) -> Self {
        Self::Merge {
            message: message.into(),
        }
    }

    /// Create a generation error
    pub fn generate<S: Into<String>>(message: S) -> Self {
        Self::Generate {
            message: message.into(),
        }
    }

    /// Create a post-processing error
    pub fn post_process<S: Into<String>>(message: S) -> Self {
        Self::PostProcess {
            message: message.into(),
        }
    }

    /// Create a release error
    pub fn release<S: Into<String>>(message: S) -> Self {
        Self::Release {
            message: message.into(),
        }
    }

    /// Create a transport error carrying the HTTP status code
    pub fn transport<S: Into<String>>(status: u16, message: S) -> Self {
        Self::Transport {
            status,
            message: message.into(),
        }
    }

    /// The HTTP status code attached to this error, if any
    pub fn status_code(&self) -> Option<u16> {
        match self {
            KubegenError::Transport { status, .. } => Some(*status),
            KubegenError::Api { status, .. } => Some(*status),
            KubegenError::Http(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }

    /// Get the error category for logging
    pub fn category(&self) -> &'static str {
        match self {
            KubegenError::Config { .. } => "config",
            KubegenError::Discovery { .. } => "discovery",
            KubegenError::Merge { .. } => "merge",
            KubegenError::Generate { .. } => "generate",
            KubegenError::PostProcess { .. } => "post_process",
            KubegenError::Release { .. } => "release",
            KubegenError::Transport { .. } => "transport",
            KubegenError::Api { .. } => "api",
            KubegenError::Io(_) => "io",
            KubegenError::Serde(_) => "serialization",
            KubegenError::Yaml(_) => "yaml",
            KubegenError::Http(_) => "http",
            KubegenError::Internal(_) => "internal",
        }
    }
}

impl Clone for KubegenError {
    fn clone(&self) -> Self {
        match self {
            KubegenError::Config { message } => KubegenError::Config { message: message.clone() },
            KubegenError::Discovery { message } => KubegenError::Discovery { message: message.clone() },
            KubegenError::Merge { message } => KubegenError::Merge { message: message.clone() },
            KubegenError::Generate { message } => KubegenError::Generate { message: message.clone() },
            KubegenError::PostProcess { message } => KubegenError::PostProcess { message: message.clone() },
            KubegenError::Release { message } => KubegenError::Release { message: message.clone() },
            KubegenError::Transport { status, message } => KubegenError::Transport {
                status: *status,
                message: message.clone(),
            },
            KubegenError::Api { status, reason, message, details } => KubegenError::Api {
                status: *status,
                reason: reason.clone(),
                message: message.clone(),
                details: details.clone(),
            },

            // For non-cloneable sources, fall back to a string representation
            KubegenError::Io(e) => KubegenError::transport(0, format!("IO error: {}", e)),
            KubegenError::Serde(e) => KubegenError::generate(format!("Serialization error: {}", e)),
            KubegenError::Yaml(e) => KubegenError::config(format!("YAML error: {}", e)),
            KubegenError::Http(e) => {
                let status = e.status().map(|s| s.as_u16()).unwrap_or(0);
                KubegenError::transport(status, format!("HTTP error: {}", e))
            }
            KubegenError::Internal(e) => KubegenError::generate(format!("Internal error: {}", e)),
        }
    }
}
