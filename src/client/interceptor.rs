//! Structured error translation
//!
//! Kubernetes reports request failures as a `Status` object in the response
//! body. When that shape is recognized the generic transport error is
//! replaced by a structured API error carrying the machine-readable reason
//! and details.

use crate::error::KubegenError;
use serde::Deserialize;
use serde_json::Value;

/// Kubernetes `Status` response body
#[derive(Debug, Deserialize)]
struct StatusBody {
    kind: Option<String>,
    status: Option<String>,
    message: Option<String>,
    reason: Option<String>,
    code: Option<u16>,
    details: Option<Value>,
}

impl StatusBody {
    fn is_failure_status(&self) -> bool {
        self.kind.as_deref() == Some("Status") && self.status.as_deref() == Some("Failure")
    }
}

/// Translate a non-2xx response into the richest error the body supports.
///
/// A recognizable `Status` body yields `KubegenError::Api`; anything else
/// falls back to the generic transport error with the status attached.
pub fn translate_error_response(status: u16, body: &[u8]) -> KubegenError {
    if let Ok(parsed) = serde_json::from_slice::<StatusBody>(body) {
        if parsed.is_failure_status() {
            return KubegenError::Api {
                status: parsed.code.unwrap_or(status),
                reason: parsed.reason.unwrap_or_else(|| "Unknown".to_string()),
                message: parsed
                    .message
                    .unwrap_or_else(|| "API request failed".to_string()),
                details: parsed.details,
            };
        }
    }

    KubegenError::transport(status, format!("API request failed with status {}", status))
}
