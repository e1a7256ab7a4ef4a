//! PublicEventResolver component.
//!
//! The PublicEventResolver is responsible for:
//! - Issuing a public-events request for every organization identifier it
//!   is handed, skipping blank identifiers
//! - Tagging each request with a monotonically increasing ticket
//! - Committing only the completion of the most recently issued ticket, so a
//!   slow response for a superseded identifier can never overwrite a newer
//!   one
//! - Falling back to an empty collection when the latest request fails

use crate::backend::{BackendError, DashboardBackend};
use crate::events::{OrganizationId, PublicEventsTicket};
use crate::status::OperationStatus;
use messecall_sdk::objects::Event;
use tracing::{debug, info, warn};

/// Holds the public event collection of one organization.
#[derive(Debug, Default)]
pub struct PublicEventResolver {
    events: Vec<Event>,
    /// Organization the current collection belongs to.
    scope: Option<OrganizationId>,
    /// Ticket of the most recently issued request.
    latest: Option<PublicEventsTicket>,
    next_seq: u64,
    loading: bool,
    status: OperationStatus,
}

impl PublicEventResolver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Issue a request for `raw_organization_id`.
    ///
    /// Returns the ticket the caller must fetch for, or `None` when the
    /// identifier is blank. A blank identifier leaves the collection and
    /// any outstanding request untouched.
    pub fn request(&mut self, raw_organization_id: &str) -> Option<PublicEventsTicket> {
        let Some(organization_id) = OrganizationId::parse(raw_organization_id) else {
            debug!("Blank organization id, skipping public events request");
            return None;
        };

        self.next_seq += 1;
        let ticket = PublicEventsTicket {
            seq: self.next_seq,
            organization_id,
        };
        if let Some(superseded) = self.latest.as_ref().filter(|_| self.loading) {
            debug!(
                superseded_seq = superseded.seq,
                superseded_id = %superseded.organization_id,
                seq = ticket.seq,
                "Public events request superseded"
            );
        }
        self.latest = Some(ticket.clone());
        self.loading = true;
        self.status = OperationStatus::Pending;
        Some(ticket)
    }

    /// Apply a completion.
    ///
    /// Returns `true` if the result was committed, `false` if it belonged to
    /// a superseded ticket and was discarded.
    pub fn complete(
        &mut self,
        ticket: &PublicEventsTicket,
        result: Result<Vec<Event>, BackendError>,
    ) -> bool {
        if self.latest.as_ref() != Some(ticket) {
            debug!(
                seq = ticket.seq,
                organization_id = %ticket.organization_id,
                "Discarding stale public events response"
            );
            return false;
        }

        match result {
            Ok(events) => {
                info!(
                    organization_id = %ticket.organization_id,
                    count = events.len(),
                    "Public events loaded"
                );
                self.status = OperationStatus::Succeeded(format!("{} events", events.len()));
                self.events = events;
            }
            Err(e) => {
                warn!(
                    organization_id = %ticket.organization_id,
                    error = %e,
                    kind = ?e.kind,
                    "Failed to load public events"
                );
                self.status = OperationStatus::Failed(e.message);
                self.events.clear();
            }
        }
        self.scope = Some(ticket.organization_id.clone());
        self.loading = false;
        true
    }

    /// Issue, fetch and apply in one step.
    ///
    /// Only suitable when calls are not interleaved; concurrent callers
    /// should use [`request`](Self::request) and [`complete`](Self::complete)
    /// so the staleness guard can do its job.
    pub async fn load_public_events(
        &mut self,
        backend: &dyn DashboardBackend,
        raw_organization_id: &str,
    ) -> &[Event] {
        if let Some(ticket) = self.request(raw_organization_id) {
            let result = backend.list_public_events(&ticket.organization_id).await;
            self.complete(&ticket, result);
        }
        &self.events
    }

    pub fn events(&self) -> &[Event] {
        &self.events
    }

    /// Organization the current collection was fetched for.
    pub fn scope(&self) -> Option<&OrganizationId> {
        self.scope.as_ref()
    }

    /// Organization of the most recently issued request.
    pub fn target(&self) -> Option<&OrganizationId> {
        self.latest.as_ref().map(|ticket| &ticket.organization_id)
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn status(&self) -> &OperationStatus {
        &self.status
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::testing::{Call, ScriptedBackend, event};
    use std::sync::Arc;

    #[test]
    fn test_blank_id_issues_nothing() {
        let mut resolver = PublicEventResolver::new();
        assert!(resolver.request("").is_none());
        assert!(resolver.request("  ").is_none());
        assert!(!resolver.is_loading());
        assert_eq!(resolver.status(), &OperationStatus::Idle);
    }

    #[test]
    fn test_blank_id_keeps_previous_collection() {
        let mut resolver = PublicEventResolver::new();
        let ticket = resolver.request("1").unwrap();
        resolver.complete(&ticket, Ok(vec![event(1, "Hochamt", "2025-03-09T10:00:00")]));

        assert!(resolver.request("").is_none());
        assert_eq!(resolver.events().len(), 1);
        assert_eq!(resolver.scope().map(OrganizationId::as_str), Some("1"));
    }

    #[test]
    fn test_tickets_are_scoped_and_monotonic() {
        let mut resolver = PublicEventResolver::new();
        let first = resolver.request("1").unwrap();
        let second = resolver.request("2").unwrap();
        assert_eq!(first.organization_id.as_str(), "1");
        assert_eq!(second.organization_id.as_str(), "2");
        assert!(second.seq > first.seq);
        assert_eq!(resolver.target().map(OrganizationId::as_str), Some("2"));
    }

    #[test]
    fn test_late_response_for_superseded_id_is_discarded() {
        let mut resolver = PublicEventResolver::new();
        let first = resolver.request("1").unwrap();
        let second = resolver.request("2").unwrap();

        assert!(resolver.complete(&second, Ok(vec![event(20, "Taize", "2025-03-10T19:00:00")])));
        assert!(!resolver.complete(&first, Ok(vec![event(10, "Hochamt", "2025-03-09T10:00:00")])));

        let ids: Vec<i64> = resolver.events().iter().map(|e| e.id).collect();
        assert_eq!(ids, vec![20]);
        assert_eq!(resolver.scope().map(OrganizationId::as_str), Some("2"));
        assert!(!resolver.is_loading());
    }

    #[test]
    fn test_stale_failure_does_not_clear_collection() {
        let mut resolver = PublicEventResolver::new();
        let first = resolver.request("1").unwrap();
        let second = resolver.request("2").unwrap();
        resolver.complete(&second, Ok(vec![event(20, "Taize", "2025-03-10T19:00:00")]));

        assert!(!resolver.complete(&first, Err(BackendError::rejected("boom"))));
        assert_eq!(resolver.events().len(), 1);
    }

    #[test]
    fn test_early_response_for_superseded_id_keeps_loading() {
        let mut resolver = PublicEventResolver::new();
        let first = resolver.request("1").unwrap();
        let _second = resolver.request("2").unwrap();

        assert!(!resolver.complete(&first, Ok(vec![event(10, "Hochamt", "2025-03-09T10:00:00")])));
        assert!(resolver.events().is_empty());
        assert!(resolver.is_loading());
    }

    #[test]
    fn test_latest_failure_resets_to_empty() {
        let mut resolver = PublicEventResolver::new();
        let ticket = resolver.request("1").unwrap();
        resolver.complete(&ticket, Ok(vec![event(1, "Hochamt", "2025-03-09T10:00:00")]));
        let ticket = resolver.request("1").unwrap();
        assert!(resolver.complete(&ticket, Err(BackendError::transport("timed out"))));

        assert!(resolver.events().is_empty());
        assert!(!resolver.is_loading());
    }

    #[tokio::test]
    async fn test_empty_response_is_not_an_error() {
        let backend = Arc::new(ScriptedBackend::default());
        let handle = {
            let backend = backend.clone();
            tokio::spawn(async move {
                let mut resolver = PublicEventResolver::new();
                resolver.load_public_events(backend.as_ref(), "1").await;
                (resolver.events().len(), resolver.status().clone())
            })
        };
        while backend.parked() == 0 {
            tokio::task::yield_now().await;
        }
        backend.release_public_events("1", Ok(vec![]));

        let (count, status) = handle.await.unwrap();
        assert_eq!(count, 0);
        assert!(matches!(status, OperationStatus::Succeeded(_)));
        assert_eq!(backend.calls(), vec![Call::ListPublicEvents("1".to_owned())]);
    }
}
