//! Validated runtime configuration.

use std::time::Duration;
use url::Url;

/// Configuration after file loading, CLI overrides and validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuntimeConfig {
    pub api_base: Url,
    pub timeout: Duration,
    /// Initial organization identifier; may be blank.
    pub church_id: String,
}

impl RuntimeConfig {
    /// Build the HTTP client the dashboard talks to the backend with.
    pub fn http_client(&self) -> reqwest::Client {
        reqwest::Client::builder()
            .timeout(self.timeout)
            .build()
            .unwrap_or_else(|_| reqwest::Client::new())
    }
}
