//! Turns the day's events into the text posted to the webhook.
//!
//! Formatting is pure: the same batch and reference zone always give the
//! same digest.

use crate::components::calendar_source::CalendarEvent;
use crate::utils::time::{format_clock, format_day, parse_timestamp, ReferenceZone};
use chrono::DateTime;
use chrono_tz::Tz;

/// Digest text when there is nothing on the calendar
pub const NO_EVENTS_MESSAGE: &str = "No events today.";
/// Title shown for events without one
pub const NO_TITLE: &str = "(No title)";
/// Time portion for all-day events
pub const ALL_DAY: &str = "All day";
/// Placeholder for a missing or unparseable time
pub const UNKNOWN_TIME: &str = "?";

/// Build the digest for a batch of events, one line per event in input order
pub fn build_digest(events: &[CalendarEvent], zone: &ReferenceZone) -> String {
    if events.is_empty() {
        return NO_EVENTS_MESSAGE.to_string();
    }

    events
        .iter()
        .map(|event| format_event(event, zone))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Format a single event as `{when}: {title}{ @ location}`
pub fn format_event(event: &CalendarEvent, zone: &ReferenceZone) -> String {
    let title = non_blank(event.title.as_deref()).unwrap_or(NO_TITLE);
    let location = non_blank(event.location.as_deref())
        .map(|location| format!(" @ {}", location))
        .unwrap_or_default();

    format!("{}: {}{}", format_when(event, zone), title, location)
}

/// Format the time portion of an event.
///
/// Timed events render as `Tue 12/17 9:00 AM–9:30 AM ET`. The date comes
/// from the start time, or from the end time when the start is unusable.
/// Each unusable side is shown as `?`.
pub fn format_when(event: &CalendarEvent, zone: &ReferenceZone) -> String {
    if event.is_all_day() {
        return ALL_DAY.to_string();
    }

    let start = resolve_time(event.start.as_deref(), zone);
    let end = resolve_time(event.end.as_deref(), zone);
    let range = format!("{}–{} {}", clock_or_unknown(&start), clock_or_unknown(&end), zone.label);

    match start.as_ref().or(end.as_ref()) {
        Some(anchor) => format!("{} {}", format_day(anchor), range),
        None => range,
    }
}

fn resolve_time(raw: Option<&str>, zone: &ReferenceZone) -> Option<DateTime<Tz>> {
    raw.and_then(parse_timestamp).map(|instant| zone.localize(instant))
}

fn clock_or_unknown(time: &Option<DateTime<Tz>>) -> String {
    time.as_ref()
        .map(format_clock)
        .unwrap_or_else(|| UNKNOWN_TIME.to_string())
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.trim().is_empty())
}
