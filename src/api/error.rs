//! Typed errors for backlog service calls
//!
//! The controller formats every remote failure as
//! `"<action prefix>: <detail>"`, so the `Display` of [`ApiError`] is the
//! detail part: the service-provided `detail` verbatim when present, a
//! transport message otherwise.

use serde_json::Value;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ApiError {
    /// The service answered with a non-success status
    #[error("{}", service_message(.status, .detail))]
    Service { status: u16, detail: Option<String> },

    /// Connection refused, timeout, broken body, ...
    #[error("{0}")]
    Network(String),

    /// The payload did not match the expected schema
    #[error("Invalid response payload: {0}")]
    InvalidPayload(String),

    /// The base URL or an endpoint could not be built
    #[error("Invalid service URL: {0}")]
    InvalidUrl(String),

    /// Saving an export to disk failed
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl ApiError {
    /// Convert an HTTP status and the raw error body into a typed error
    pub fn from_http_status(status: reqwest::StatusCode, body: &str) -> Self {
        ApiError::Service {
            status: status.as_u16(),
            detail: extract_detail(body),
        }
    }

    /// Convert network/connection errors into a typed error
    pub fn from_network_error(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            ApiError::Network(format!("Request timeout: {}", e))
        } else if e.is_connect() {
            ApiError::Network(format!("Connection failed: {}", e))
        } else if e.is_decode() {
            ApiError::InvalidPayload(e.to_string())
        } else if let Some(status) = e.status() {
            ApiError::Service {
                status: status.as_u16(),
                detail: None,
            }
        } else {
            ApiError::Network(e.to_string())
        }
    }

    /// HTTP status of a service error
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Service { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// The service-provided detail, if any
    pub fn detail(&self) -> Option<&str> {
        match self {
            ApiError::Service { detail, .. } => detail.as_deref(),
            _ => None,
        }
    }
}

fn service_message(status: &u16, detail: &Option<String>) -> String {
    match detail {
        Some(detail) => detail.clone(),
        None => format!("Request failed with status code {}", status),
    }
}

/// Pull the human readable `detail` out of an error body.
///
/// Plain strings are used verbatim; validation error lists are flattened
/// by joining their `msg` fields.
fn extract_detail(body: &str) -> Option<String> {
    let value: Value = serde_json::from_str(body).ok()?;
    match value.get("detail")? {
        Value::String(s) if !s.trim().is_empty() => Some(s.clone()),
        Value::Array(items) => {
            let messages: Vec<&str> = items
                .iter()
                .filter_map(|item| item.get("msg").and_then(Value::as_str))
                .collect();
            if messages.is_empty() {
                None
            } else {
                Some(messages.join("; "))
            }
        }
        _ => None,
    }
}
