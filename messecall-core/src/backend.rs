//! The backend seam used by the dashboard components.
//!
//! Components talk to [`DashboardBackend`] rather than to the HTTP client
//! directly, so the transport can be swapped out (the tests drive the
//! components with a scripted in-memory backend).

use crate::events::OrganizationId;
use async_trait::async_trait;
use messecall_sdk::client::{ClientError, DashboardClient};
use messecall_sdk::objects::{Event, SwapRequestCreate, SwapRequestCreated};
use thiserror::Error;

/// Where a backend call failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    /// The request never produced a usable response (network, decoding).
    Transport,
    /// The backend answered with a non-2xx status.
    Rejected,
}

/// A normalized backend failure.
///
/// Transport and rejection errors collapse into one type whose message is
/// the response body text, or a fallback literal when there was none.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct BackendError {
    pub kind: FailureKind,
    pub message: String,
}

impl BackendError {
    pub fn transport(message: impl Into<String>) -> Self {
        Self {
            kind: FailureKind::Transport,
            message: message.into(),
        }
    }

    pub fn rejected(message: impl Into<String>) -> Self {
        Self {
            kind: FailureKind::Rejected,
            message: message.into(),
        }
    }
}

impl From<ClientError> for BackendError {
    fn from(e: ClientError) -> Self {
        let kind = match e {
            ClientError::Api { .. } => FailureKind::Rejected,
            _ => FailureKind::Transport,
        };
        Self {
            kind,
            message: e.detail(),
        }
    }
}

/// The three backend operations the dashboard core depends on.
#[async_trait]
pub trait DashboardBackend: Send + Sync {
    /// List every internal event.
    async fn list_events(&self) -> Result<Vec<Event>, BackendError>;

    /// List the public events of one organization.
    async fn list_public_events(
        &self,
        organization_id: &OrganizationId,
    ) -> Result<Vec<Event>, BackendError>;

    /// Create a swap request.
    async fn create_swap_request(
        &self,
        payload: &SwapRequestCreate,
    ) -> Result<SwapRequestCreated, BackendError>;
}

#[async_trait]
impl DashboardBackend for DashboardClient {
    async fn list_events(&self) -> Result<Vec<Event>, BackendError> {
        Ok(DashboardClient::list_events(self).await?)
    }

    async fn list_public_events(
        &self,
        organization_id: &OrganizationId,
    ) -> Result<Vec<Event>, BackendError> {
        Ok(DashboardClient::list_public_events(self, organization_id.as_str()).await?)
    }

    async fn create_swap_request(
        &self,
        payload: &SwapRequestCreate,
    ) -> Result<SwapRequestCreated, BackendError> {
        Ok(DashboardClient::create_swap_request(self, payload).await?)
    }
}
