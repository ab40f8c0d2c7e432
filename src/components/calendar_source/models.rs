use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// Calendar event as emitted by the producer.
///
/// Fields of the wrong JSON type never reject the event: text fields that
/// are not strings read as absent, and `allDay` follows JSON truthiness.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct CalendarEvent {
    #[serde(
        default,
        deserialize_with = "lenient_string",
        skip_serializing_if = "Option::is_none"
    )]
    pub title: Option<String>,
    #[serde(
        default,
        deserialize_with = "lenient_string",
        skip_serializing_if = "Option::is_none"
    )]
    pub location: Option<String>,
    #[serde(
        default,
        deserialize_with = "truthy_bool",
        skip_serializing_if = "Option::is_none"
    )]
    pub all_day: Option<bool>,
    #[serde(
        default,
        deserialize_with = "lenient_string",
        skip_serializing_if = "Option::is_none"
    )]
    pub start: Option<String>,
    #[serde(
        default,
        deserialize_with = "lenient_string",
        skip_serializing_if = "Option::is_none"
    )]
    pub end: Option<String>,
}

/// Strings pass through; any other JSON value reads as absent
fn lenient_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::String(s) => Some(s),
        _ => None,
    })
}

/// Booleans pass through; other values count as true when non-zero or non-empty
fn truthy_bool<'de, D>(deserializer: D) -> Result<Option<bool>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::Null => None,
        Value::Bool(b) => Some(b),
        Value::Number(n) => Some(n.as_f64().map_or(true, |f| f != 0.0)),
        Value::String(s) => Some(!s.is_empty()),
        Value::Array(a) => Some(!a.is_empty()),
        Value::Object(o) => Some(!o.is_empty()),
    })
}

impl CalendarEvent {
    /// Create a timed event
    pub fn timed(title: &str, start: &str, end: &str) -> Self {
        Self {
            title: Some(title.to_string()),
            start: Some(start.to_string()),
            end: Some(end.to_string()),
            ..Default::default()
        }
    }

    /// Create an all-day event
    pub fn all_day(title: &str) -> Self {
        Self {
            title: Some(title.to_string()),
            all_day: Some(true),
            ..Default::default()
        }
    }

    /// Set the location
    pub fn with_location(mut self, location: &str) -> Self {
        self.location = Some(location.to_string());
        self
    }

    /// Whether the event spans the whole day
    pub fn is_all_day(&self) -> bool {
        self.all_day.unwrap_or(false)
    }
}

/// Ordered events for one run; order is the producer's order
pub type EventBatch = Vec<CalendarEvent>;

/// Top-level document printed by the producer
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SourceDocument {
    #[serde(default)]
    pub events: Option<EventBatch>,
}

impl SourceDocument {
    /// Events in the document; a missing or null list is empty
    pub fn into_batch(self) -> EventBatch {
        self.events.unwrap_or_default()
    }
}
