//! Event payload types.
//!
//! Mirrors the event records returned by `GET /events` and
//! `GET /public/churches/{church_id}/events`.

use serde::{Deserialize, Serialize};
use time::format_description::well_known::Rfc3339;
use time::macros::format_description;
use time::{OffsetDateTime, PrimitiveDateTime};

/// Label shown for events whose backend record has no location.
pub const DEFAULT_LOCATION_LABEL: &str = "Church";

/// A single scheduled service occurrence as returned by the backend.
///
/// Only `id` and `start_time` are mandatory on the wire. The backend names
/// the event kind `type`; it is accepted as the title when no `title` field
/// is present.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Event {
    pub id: i64,
    #[serde(default, alias = "type")]
    pub title: String,
    pub start_time: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(default)]
    pub is_public: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub church_id: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_time: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub required_slots: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub requires_experienced: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// Whether an event is listed publicly or only for the parish team.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Visibility {
    Public,
    Internal,
}

impl std::fmt::Display for Visibility {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Visibility::Public => write!(f, "public"),
            Visibility::Internal => write!(f, "internal"),
        }
    }
}

impl Event {
    /// The location, or [`DEFAULT_LOCATION_LABEL`] when the backend sent none.
    pub fn location_label(&self) -> &str {
        match self.location.as_deref() {
            Some(location) if !location.trim().is_empty() => location,
            _ => DEFAULT_LOCATION_LABEL,
        }
    }

    pub fn visibility(&self) -> Visibility {
        if self.is_public {
            Visibility::Public
        } else {
            Visibility::Internal
        }
    }

    /// Parse `start_time`.
    ///
    /// Accepts RFC 3339 timestamps and the naive `YYYY-MM-DDTHH:MM:SS[.fff]`
    /// form the backend emits, which is taken to be UTC. Returns `None` for
    /// anything else.
    pub fn starts_at(&self) -> Option<OffsetDateTime> {
        parse_timestamp(&self.start_time)
    }
}

/// Parse an ISO-8601-like timestamp as sent by the backend.
pub fn parse_timestamp(raw: &str) -> Option<OffsetDateTime> {
    let raw = raw.trim();
    if let Ok(parsed) = OffsetDateTime::parse(raw, &Rfc3339) {
        return Some(parsed);
    }
    let naive = format_description!(
        "[year]-[month]-[day]T[hour]:[minute]:[second][optional [.[subsecond]]]"
    );
    PrimitiveDateTime::parse(raw, naive)
        .ok()
        .map(PrimitiveDateTime::assume_utc)
}
