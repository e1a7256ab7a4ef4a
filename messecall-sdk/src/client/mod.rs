//! HTTP client for the MesseCall backend.
//!
//! Gated behind the `client` cargo feature so downstream crates that only
//! need the shared types do not pull in `reqwest`.

mod dashboard;

pub use dashboard::DashboardClient;

use reqwest::StatusCode;

/// Message used when a rejected request carries no body.
pub const FALLBACK_ERROR_MESSAGE: &str = "API request failed";

/// Errors produced by the SDK HTTP client.
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    /// Transport-level failure (DNS, TLS, connection reset, timeout, …).
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),

    /// The server returned a non-2xx status code.
    #[error("api error: status {status}, body: {body}")]
    Api { status: StatusCode, body: String },

    /// Response body could not be deserialized.
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    /// The base URL could not be joined with the endpoint path.
    #[error("invalid url: {0}")]
    Url(#[from] url::ParseError),
}

impl ClientError {
    /// A single human-readable detail for this failure.
    ///
    /// Rejections yield the response body text, or
    /// [`FALLBACK_ERROR_MESSAGE`] when the body is empty. Every other
    /// variant yields its display text.
    pub fn detail(&self) -> String {
        match self {
            ClientError::Api { body, .. } if !body.trim().is_empty() => body.clone(),
            ClientError::Api { .. } => FALLBACK_ERROR_MESSAGE.to_owned(),
            other => other.to_string(),
        }
    }

    /// The HTTP status of a rejection, if this is one.
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            ClientError::Api { status, .. } => Some(*status),
            ClientError::Http(e) => e.status(),
            _ => None,
        }
    }
}
