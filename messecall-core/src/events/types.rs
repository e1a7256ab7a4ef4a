//! Message type definitions for the dashboard's unidirectional data flow.
//!
//! Commands flow in from the user, completions flow back from the network
//! tasks, and only the coordinator applies either to component state.

use crate::backend::BackendError;
use messecall_sdk::objects::{Event, SwapRequestCreated};

/// Identifier of the organization (parish) that scopes the public event
/// list.
///
/// Always non-blank; construct through [`OrganizationId::parse`].
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct OrganizationId(String);

impl OrganizationId {
    /// Returns `None` for empty or whitespace-only input.
    pub fn parse(raw: &str) -> Option<Self> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(Self(trimmed.to_owned()))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for OrganizationId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Identifies one issued public-events request.
///
/// `seq` grows monotonically per resolver; a completion is only committed
/// when its ticket is the latest one issued.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PublicEventsTicket {
    pub seq: u64,
    pub organization_id: OrganizationId,
}

/// User intents handled by the coordinator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DashboardCommand {
    /// The selected organization identifier changed (raw input, may be blank).
    SetOrganizationId(String),
    /// Submit a swap request from raw form input.
    SubmitSwap {
        assignment_id: String,
        user_ids: String,
    },
}

/// Result of a network task, routed back to the component that issued it.
#[derive(Debug, Clone)]
pub enum Completion {
    InternalEvents(Result<Vec<Event>, BackendError>),
    PublicEvents {
        ticket: PublicEventsTicket,
        result: Result<Vec<Event>, BackendError>,
    },
    SwapRequest(Result<SwapRequestCreated, BackendError>),
}
