//! EventAggregator component.
//!
//! The EventAggregator is responsible for:
//! - Fetching the internal event list once per session
//! - Replacing its collection with the response, in response order
//! - Falling back to an empty collection when the fetch fails
//! - Exposing a loading flag while the fetch is outstanding

use crate::backend::{BackendError, DashboardBackend};
use crate::status::OperationStatus;
use messecall_sdk::objects::Event;
use tracing::{debug, info, warn};

/// Holds the organization-agnostic internal event collection.
#[derive(Debug, Default)]
pub struct EventAggregator {
    events: Vec<Event>,
    loading: bool,
    started: bool,
    status: OperationStatus,
}

impl EventAggregator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mark the session's single fetch as issued.
    ///
    /// Returns `false` if the fetch was already issued this session, in
    /// which case no request must be sent.
    pub fn begin(&mut self) -> bool {
        if self.started {
            debug!("Internal events already requested this session");
            return false;
        }
        self.started = true;
        self.loading = true;
        self.status = OperationStatus::Pending;
        true
    }

    /// Apply the result of the fetch issued by [`begin`](Self::begin).
    ///
    /// Failures are absorbed: the collection becomes empty and nothing is
    /// reported to the caller.
    pub fn complete(&mut self, result: Result<Vec<Event>, BackendError>) {
        match result {
            Ok(events) => {
                info!(count = events.len(), "Internal events loaded");
                self.status = OperationStatus::Succeeded(format!("{} events", events.len()));
                self.events = events;
            }
            Err(e) => {
                warn!(error = %e, kind = ?e.kind, "Failed to load internal events");
                self.status = OperationStatus::Failed(e.message);
                self.events.clear();
            }
        }
        self.loading = false;
    }

    /// Fetch the internal events and apply the result in one step.
    pub async fn load_internal_events(&mut self, backend: &dyn DashboardBackend) -> &[Event] {
        if self.begin() {
            let result = backend.list_events().await;
            self.complete(result);
        }
        &self.events
    }

    pub fn events(&self) -> &[Event] {
        &self.events
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    /// Diagnostic status of the fetch. Failures here are never shown to
    /// the user.
    pub fn status(&self) -> &OperationStatus {
        &self.status
    }
}
