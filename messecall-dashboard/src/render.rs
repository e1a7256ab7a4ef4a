//! Plain-text rendering of dashboard snapshots.

use messecall_core::{DashboardSnapshot, OperationStatus};
use messecall_sdk::objects::Event;
use std::fmt::Write;
use time::macros::format_description;

fn format_start(event: &Event) -> String {
    let format = format_description!("[weekday repr:short] [day].[month].[year] [hour]:[minute]");
    event
        .starts_at()
        .and_then(|starts_at| starts_at.format(format).ok())
        .unwrap_or_else(|| event.start_time.clone())
}

/// Render one event list as an aligned table.
pub fn render_events(caption: &str, events: &[Event], loading: bool, empty_label: &str) -> String {
    let mut out = String::new();
    if loading {
        let _ = writeln!(out, "{caption} (loading ...)");
    } else {
        let _ = writeln!(out, "{caption} ({} entries)", events.len());
    }

    if events.is_empty() {
        let _ = writeln!(out, "  {empty_label}");
        return out;
    }

    for event in events {
        let _ = writeln!(
            out,
            "  #{:<5} {:<24} {:<22} {:<20} {}",
            event.id,
            event.title,
            format_start(event),
            event.location_label(),
            event.visibility()
        );
    }
    out
}

/// Render the swap submission status line, if there is anything to show.
pub fn render_swap_status(status: &OperationStatus) -> Option<String> {
    match status {
        OperationStatus::Idle => None,
        OperationStatus::Pending => Some("Swap request: sending ...".to_owned()),
        OperationStatus::Succeeded(message) => Some(format!("Swap request: {message}")),
        OperationStatus::Failed(message) => Some(format!("Swap request failed: {message}")),
    }
}

/// Render the whole dashboard.
pub fn render_snapshot(snapshot: &DashboardSnapshot) -> String {
    let mut out = String::new();

    match &snapshot.next_event {
        Some(next) => {
            let format = format_description!("[weekday repr:short] [hour]:[minute]");
            let when = next
                .starts_at
                .format(format)
                .unwrap_or_else(|_| next.starts_at.to_string());
            let _ = writeln!(out, "Next: {} ({when}, {})", next.title, next.location);
        }
        None => {
            let _ = writeln!(out, "Next: no upcoming events");
        }
    }
    out.push('\n');

    out.push_str(&render_events(
        "All events",
        &snapshot.events,
        snapshot.events_loading,
        "No data",
    ));
    out.push('\n');

    let caption = match &snapshot.public_scope {
        Some(scope) => format!("Public events of church {scope}"),
        None => format!("Public events of church {}", snapshot.organization_id),
    };
    out.push_str(&render_events(
        &caption,
        &snapshot.public_events,
        snapshot.public_events_loading,
        "No public events",
    ));

    if let Some(line) = render_swap_status(&snapshot.swap_status) {
        out.push('\n');
        out.push_str(&line);
        out.push('\n');
    }
    out
}
