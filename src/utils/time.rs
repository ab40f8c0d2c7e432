use chrono::{DateTime, FixedOffset, NaiveDateTime, Utc};
use chrono_tz::Tz;

/// Timestamp layouts carrying an explicit offset, tried after RFC 3339
const OFFSET_FORMATS: [&str; 2] = ["%Y-%m-%dT%H:%M:%S%.f%z", "%Y-%m-%dT%H:%M%z"];

/// Timestamp layouts without an offset; these are read as UTC
const NAIVE_FORMATS: [&str; 2] = ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%dT%H:%M"];

/// Civil timezone event times are rendered in, plus the label shown after them
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReferenceZone {
    pub tz: Tz,
    pub label: String,
}

impl Default for ReferenceZone {
    fn default() -> Self {
        Self {
            tz: chrono_tz::America::New_York,
            label: "ET".to_string(),
        }
    }
}

impl ReferenceZone {
    /// Create a reference zone with a custom label
    pub fn new(tz: Tz, label: impl Into<String>) -> Self {
        Self {
            tz,
            label: label.into(),
        }
    }

    /// Convert a UTC instant to civil time in this zone
    pub fn localize(&self, instant: DateTime<Utc>) -> DateTime<Tz> {
        instant.with_timezone(&self.tz)
    }
}

/// Parse an ISO-8601 timestamp into a UTC instant.
///
/// Accepts `Z` or numeric offsets (with or without a colon) and optional
/// fractional seconds. A timestamp without any offset is taken as UTC.
pub fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }

    for format in OFFSET_FORMATS {
        if let Ok(dt) = DateTime::<FixedOffset>::parse_from_str(raw, format) {
            return Some(dt.with_timezone(&Utc));
        }
    }

    for format in NAIVE_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(raw, format) {
            return Some(dt.and_utc());
        }
    }

    None
}

/// Weekday and month/day, e.g. `Tue 12/17`
pub fn format_day(dt: &DateTime<Tz>) -> String {
    dt.format("%a %m/%d").to_string()
}

/// 12-hour clock time without a leading zero, e.g. `9:05 AM`
pub fn format_clock(dt: &DateTime<Tz>) -> String {
    dt.format("%-I:%M %p").to_string()
}
