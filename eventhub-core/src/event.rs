//! Event records as supplied by the event feed.
//!
//! Records are read-only input to the exporters. Timestamps are kept as the
//! raw strings the feed delivered and are only parsed at export time, so a
//! malformed value is reported against the event that carried it.

use std::fmt;

use chrono::{DateTime, Datelike, Duration, NaiveDate, NaiveDateTime, TimeZone, Utc};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};

use crate::error::{EventHubError, EventHubResult};

/// Naive date-time layouts accepted for `start`/`end`, tried in order.
const NAIVE_FORMATS: [&str; 4] = [
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
];

/// Years that fit the four-digit `YYYYMMDDTHHMMSSZ` form of ICS date-times.
const YEAR_RANGE: std::ops::RangeInclusive<i32> = 0..=9999;

/// Opaque event identifier. The feed serves integers, other sources strings.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum EventId {
    Number(i64),
    Text(String),
}

impl fmt::Display for EventId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EventId::Number(n) => write!(f, "{}", n),
            EventId::Text(s) => f.write_str(s),
        }
    }
}

impl From<i64> for EventId {
    fn from(n: i64) -> Self {
        EventId::Number(n)
    }
}

impl From<i32> for EventId {
    fn from(n: i32) -> Self {
        EventId::Number(n.into())
    }
}

impl From<&str> for EventId {
    fn from(s: &str) -> Self {
        EventId::Text(s.to_string())
    }
}

impl From<String> for EventId {
    fn from(s: String) -> Self {
        EventId::Text(s)
    }
}

/// A single calendar event as delivered by the event feed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventRecord {
    pub id: EventId,
    pub title: String,
    /// Start timestamp (RFC 3339, naive ISO 8601 or a bare date)
    pub start: String,
    /// Explicit end timestamp; when absent the export default duration applies
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl EventRecord {
    pub fn new(
        id: impl Into<EventId>,
        title: impl Into<String>,
        start: impl Into<String>,
    ) -> Self {
        EventRecord {
            id: id.into(),
            title: title.into(),
            start: start.into(),
            end: None,
            location: None,
            category: None,
            description: None,
        }
    }

    pub fn with_end(mut self, end: impl Into<String>) -> Self {
        self.end = Some(end.into());
        self
    }

    pub fn with_location(mut self, location: impl Into<String>) -> Self {
        self.location = Some(location.into());
        self
    }

    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Parse a JSON array of records (the shape of the `/api/events` feed).
    pub fn list_from_json(content: &str) -> EventHubResult<Vec<EventRecord>> {
        serde_json::from_str(content).map_err(|e| EventHubError::Serialization(e.to_string()))
    }

    pub fn location_str(&self) -> &str {
        self.location.as_deref().unwrap_or("")
    }

    pub fn category_str(&self) -> &str {
        self.category.as_deref().unwrap_or("")
    }

    pub fn description_str(&self) -> &str {
        self.description.as_deref().unwrap_or("")
    }

    /// Start instant, with naive timestamps read in `tz`.
    pub fn start_time(&self, tz: Tz) -> EventHubResult<DateTime<Utc>> {
        parse_timestamp(&self.start, tz).ok_or_else(|| self.invalid("start", &self.start))
    }

    /// End instant: the explicit `end` if present, otherwise start + `default_duration`.
    ///
    /// An end before the start, or one pushed past year 9999 by the default
    /// duration, is an invalid `end`.
    pub fn end_time(&self, tz: Tz, default_duration: Duration) -> EventHubResult<DateTime<Utc>> {
        let start = self.start_time(tz)?;

        let end = match self.end {
            Some(ref end) => {
                let parsed = parse_timestamp(end, tz).ok_or_else(|| self.invalid("end", end))?;
                if parsed < start {
                    return Err(self.invalid("end", end));
                }
                parsed
            }
            None => start
                .checked_add_signed(default_duration)
                .filter(|end| YEAR_RANGE.contains(&end.year()))
                .ok_or_else(|| {
                    self.invalid("end", &format!("{} + {}", self.start, default_duration))
                })?,
        };

        Ok(end)
    }

    fn invalid(&self, field: &'static str, value: &str) -> EventHubError {
        EventHubError::InvalidTimestamp {
            id: self.id.to_string(),
            field,
            value: value.to_string(),
        }
    }
}

/// Parse a feed timestamp into a UTC instant.
///
/// Values carrying an offset are converted directly. Naive date-times and
/// bare dates are local to `tz`; a local time that falls into a DST gap is
/// rejected and an ambiguous one resolves to the earlier instant. Instants
/// outside the years 0000 to 9999 (in UTC) are rejected.
pub fn parse_timestamp(value: &str, tz: Tz) -> Option<DateTime<Utc>> {
    parse_instant(value.trim(), tz).filter(|dt| YEAR_RANGE.contains(&dt.year()))
}

fn parse_instant(value: &str, tz: Tz) -> Option<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Some(dt.with_timezone(&Utc));
    }

    let naive = NAIVE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(value, fmt).ok())
        .or_else(|| {
            NaiveDate::parse_from_str(value, "%Y-%m-%d")
                .ok()
                .and_then(|d| d.and_hms_opt(0, 0, 0))
        })?;

    tz.from_local_datetime(&naive)
        .earliest()
        .map(|dt| dt.with_timezone(&Utc))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_timestamp_utc_and_offset() {
        let utc = parse_timestamp("2024-03-01T15:00:00Z", Tz::UTC).unwrap();
        assert_eq!(utc, Utc.with_ymd_and_hms(2024, 3, 1, 15, 0, 0).unwrap());

        let offset = parse_timestamp("2024-03-01T10:00:00-05:00", Tz::UTC).unwrap();
        assert_eq!(offset, utc);

        let fractional = parse_timestamp("2024-03-01T15:00:00.123Z", Tz::UTC).unwrap();
        assert_eq!(fractional.timestamp(), utc.timestamp());
    }

    #[test]
    fn test_parse_timestamp_naive_uses_timezone() {
        let utc = parse_timestamp("2024-03-01T15:00:00", Tz::UTC).unwrap();
        assert_eq!(utc, Utc.with_ymd_and_hms(2024, 3, 1, 15, 0, 0).unwrap());

        let berlin = parse_timestamp("2024-03-01T15:00:00", chrono_tz::Europe::Berlin).unwrap();
        assert_eq!(berlin, Utc.with_ymd_and_hms(2024, 3, 1, 14, 0, 0).unwrap());

        // Python isoformat() output with microseconds
        let micros = parse_timestamp("2024-03-01T15:00:00.250000", Tz::UTC).unwrap();
        assert_eq!(micros.timestamp(), utc.timestamp());

        let no_seconds = parse_timestamp("2024-03-01 15:00", Tz::UTC).unwrap();
        assert_eq!(no_seconds, utc);
    }

    #[test]
    fn test_parse_timestamp_bare_date_is_midnight() {
        let date = parse_timestamp("2024-03-01", Tz::UTC).unwrap();
        assert_eq!(date, Utc.with_ymd_and_hms(2024, 3, 1, 0, 0, 0).unwrap());
    }

    #[test]
    fn test_parse_timestamp_rejects_garbage_and_dst_gap() {
        assert!(parse_timestamp("not a date", Tz::UTC).is_none());
        assert!(parse_timestamp("2024-13-45T99:00:00Z", Tz::UTC).is_none());
        assert!(parse_timestamp("", Tz::UTC).is_none());

        // 02:30 does not exist in New York on 2024-03-10
        assert!(
            parse_timestamp("2024-03-10T02:30:00", chrono_tz::America::New_York).is_none()
        );
    }

    #[test]
    fn test_end_time_defaults_to_start_plus_duration() {
        let event = EventRecord::new("1", "Talk", "2024-03-01T15:00:00Z");
        let end = event.end_time(Tz::UTC, Duration::hours(2)).unwrap();
        assert_eq!(end, Utc.with_ymd_and_hms(2024, 3, 1, 17, 0, 0).unwrap());

        let explicit = event.with_end("2024-03-01T15:45:00Z");
        let end = explicit.end_time(Tz::UTC, Duration::hours(2)).unwrap();
        assert_eq!(end, Utc.with_ymd_and_hms(2024, 3, 1, 15, 45, 0).unwrap());
    }

    #[test]
    fn test_parse_timestamp_rejects_years_beyond_four_digits() {
        assert!(parse_timestamp("+12345-01-01T00:00:00", Tz::UTC).is_none());
        assert!(parse_timestamp("+12345-01-01", Tz::UTC).is_none());
        assert!(parse_timestamp("-0001-06-01T00:00:00", Tz::UTC).is_none());

        // Converting to UTC can roll into year 10000
        assert!(parse_timestamp("9999-12-31T23:00:00-05:00", Tz::UTC).is_none());
        assert!(parse_timestamp("9999-12-31T23:59:59Z", Tz::UTC).is_some());
    }

    #[test]
    fn test_end_time_rejects_huge_default_duration() {
        let event = EventRecord::new("1", "Forever", "2024-03-01T15:00:00Z");
        let huge = crate::config::parse_duration("300000years").unwrap();

        match event.end_time(Tz::UTC, huge) {
            Err(EventHubError::InvalidTimestamp { id, field, .. }) => {
                assert_eq!(id, "1");
                assert_eq!(field, "end");
            }
            other => panic!("Expected InvalidTimestamp for end, got {:?}", other),
        }

        let late = EventRecord::new("2", "Late", "9999-12-31T23:00:00Z");
        assert!(late.end_time(Tz::UTC, Duration::hours(2)).is_err());
    }

    #[test]
    fn test_end_time_rejects_end_before_start() {
        let event = EventRecord::new("3", "Backwards", "2024-03-01T15:00:00Z")
            .with_end("2024-03-01T14:00:00Z");

        match event.end_time(Tz::UTC, Duration::hours(2)) {
            Err(EventHubError::InvalidTimestamp { field, value, .. }) => {
                assert_eq!(field, "end");
                assert_eq!(value, "2024-03-01T14:00:00Z");
            }
            other => panic!("Expected InvalidTimestamp for end, got {:?}", other),
        }

        let instant = EventRecord::new("4", "Instant", "2024-03-01T15:00:00Z")
            .with_end("2024-03-01T15:00:00Z");
        assert!(instant.end_time(Tz::UTC, Duration::hours(2)).is_ok());
    }

    #[test]
    fn test_invalid_start_names_event_and_value() {
        let event = EventRecord::new(7, "Broken", "yesterday-ish");
        match event.start_time(Tz::UTC) {
            Err(EventHubError::InvalidTimestamp { id, field, value }) => {
                assert_eq!(id, "7");
                assert_eq!(field, "start");
                assert_eq!(value, "yesterday-ish");
            }
            other => panic!("Expected InvalidTimestamp, got {:?}", other),
        }
    }

    #[test]
    fn test_list_from_json_accepts_feed_shape() {
        let json = r#"[
            {"id": 42, "title": "Launch", "start": "2024-03-01T15:00:00",
             "url": "/event/42", "description": null, "location": "HQ",
             "category": "Business"},
            {"id": "abc", "title": "Standup", "start": "2024-03-02"}
        ]"#;

        let events = EventRecord::list_from_json(json).unwrap();
        assert_eq!(events.len(), 2);
        assert_eq!(events[0].id, EventId::Number(42));
        assert_eq!(events[0].description_str(), "");
        assert_eq!(events[0].location_str(), "HQ");
        assert_eq!(events[1].id, EventId::Text("abc".to_string()));
        assert_eq!(events[1].location_str(), "");
        assert_eq!(events[1].category_str(), "");
    }

    #[test]
    fn test_list_from_json_requires_title() {
        let json = r#"[{"id": 1, "start": "2024-03-02"}]"#;
        assert!(matches!(
            EventRecord::list_from_json(json),
            Err(EventHubError::Serialization(_))
        ));
    }
}
