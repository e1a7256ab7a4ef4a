//! Immutable views of dashboard state handed to the presentation layer.

use crate::events::OrganizationId;
use crate::status::OperationStatus;
use messecall_sdk::objects::Event;
use time::OffsetDateTime;

/// The next event on the calendar, ready for display.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpcomingEvent {
    pub id: i64,
    pub title: String,
    pub starts_at: OffsetDateTime,
    pub location: String,
}

/// Earliest event starting at or after `now`.
///
/// Events whose start time cannot be parsed are skipped. Ties keep the
/// first event in response order.
pub fn next_upcoming(events: &[Event], now: OffsetDateTime) -> Option<UpcomingEvent> {
    events
        .iter()
        .filter_map(|event| event.starts_at().map(|starts_at| (starts_at, event)))
        .filter(|(starts_at, _)| *starts_at >= now)
        .min_by_key(|(starts_at, _)| *starts_at)
        .map(|(starts_at, event)| UpcomingEvent {
            id: event.id,
            title: event.title.clone(),
            starts_at,
            location: event.location_label().to_owned(),
        })
}

/// Everything the dashboard renders, captured at one point in time.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DashboardSnapshot {
    /// Organization identifier as last entered (may be blank).
    pub organization_id: String,
    pub events: Vec<Event>,
    pub events_loading: bool,
    pub public_events: Vec<Event>,
    /// Organization the public events were fetched for.
    pub public_scope: Option<OrganizationId>,
    pub public_events_loading: bool,
    pub swap_status: OperationStatus,
    pub swap_in_flight: bool,
    pub next_event: Option<UpcomingEvent>,
}
