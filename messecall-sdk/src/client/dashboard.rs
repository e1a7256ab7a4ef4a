//! Dashboard API client (dashboard → MesseCall backend).
//!
//! Covers the three endpoints the dashboard reads from and writes to, plus
//! the public calendar feed.

use reqwest::Client;
use url::Url;

use super::ClientError;
use crate::objects::event::Event;
use crate::objects::swap_request::{SwapRequestCreate, SwapRequestCreated};

/// Typed HTTP client for the MesseCall backend.
#[derive(Debug, Clone)]
pub struct DashboardClient {
    http: Client,
    base_url: Url,
}

impl DashboardClient {
    /// Create a new `DashboardClient`.
    ///
    /// `base_url` is the root of the backend (e.g. `http://localhost:8000`).
    /// A path prefix such as `https://example.org/api` is kept when joining
    /// endpoint paths.
    pub fn new(base_url: Url) -> Self {
        Self {
            http: Client::new(),
            base_url,
        }
    }

    /// Replace the default `reqwest::Client` with a custom one (e.g. to
    /// configure timeouts or a proxy).
    pub fn with_http_client(mut self, client: Client) -> Self {
        self.http = client;
        self
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn endpoint(&self, path: &str) -> Result<Url, ClientError> {
        let mut base = self.base_url.clone();
        if !base.path().ends_with('/') {
            let with_slash = format!("{}/", base.path());
            base.set_path(&with_slash);
        }
        Ok(base.join(path.trim_start_matches('/'))?)
    }

    /// `GET /events` – list every event visible to the team.
    pub async fn list_events(&self) -> Result<Vec<Event>, ClientError> {
        let url = self.endpoint("events")?;
        tracing::debug!(%url, "Fetching internal events");

        let resp = self.http.get(url).send().await?;

        parse_response(resp).await
    }

    /// `GET /public/churches/{church_id}/events` – list the public events of
    /// one parish.
    pub async fn list_public_events(&self, church_id: &str) -> Result<Vec<Event>, ClientError> {
        let url = self.endpoint(&format!(
            "public/churches/{}/events",
            urlencoding::encode(church_id)
        ))?;
        tracing::debug!(%url, church_id, "Fetching public events");

        let resp = self.http.get(url).send().await?;

        parse_response(resp).await
    }

    /// `GET /public/churches/{church_id}/events.ics` – the public events of
    /// one parish as an iCalendar document.
    pub async fn public_events_calendar(&self, church_id: &str) -> Result<String, ClientError> {
        let url = self.endpoint(&format!(
            "public/churches/{}/events.ics",
            urlencoding::encode(church_id)
        ))?;

        let resp = self.http.get(url).send().await?;
        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(ClientError::Api { status, body });
        }
        Ok(resp.text().await?)
    }

    /// `POST /swap-requests` – offer an assignment to a set of volunteers.
    pub async fn create_swap_request(
        &self,
        payload: &SwapRequestCreate,
    ) -> Result<SwapRequestCreated, ClientError> {
        let url = self.endpoint("swap-requests")?;
        tracing::debug!(
            %url,
            assignment_id = payload.assignment_id,
            candidates = payload.requested_user_ids.len(),
            "Creating swap request"
        );

        let resp = self.http.post(url).json(payload).send().await?;

        parse_response(resp).await
    }
}

async fn parse_response<T: serde::de::DeserializeOwned>(
    resp: reqwest::Response,
) -> Result<T, ClientError> {
    let status = resp.status();
    if !status.is_success() {
        let body = resp.text().await.unwrap_or_default();
        return Err(ClientError::Api { status, body });
    }
    let bytes = resp.bytes().await?;
    serde_json::from_slice(&bytes).map_err(ClientError::Json)
}
