//! Date range for filtering events.

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};

use crate::error::{EventHubError, EventHubResult};
use crate::event::EventRecord;
use crate::export::ExportOptions;

/// Date range for filtering events.
/// None values mean unbounded in that direction.
#[derive(Debug, Clone, Default)]
pub struct DateRange {
    pub from: Option<DateTime<Utc>>,
    pub to: Option<DateTime<Utc>>,
}

impl DateRange {
    /// Parse date strings into a DateRange.
    /// - `from`: YYYY-MM-DD, start of day; unbounded if not specified
    /// - `to`: YYYY-MM-DD, end of day; unbounded if not specified
    pub fn from_args(from: Option<&str>, to: Option<&str>) -> EventHubResult<Self> {
        let from = from.map(parse_date_start).transpose()?;
        let to = to.map(parse_date_end).transpose()?;

        if let (Some(from), Some(to)) = (from, to) {
            if from > to {
                return Err(EventHubError::Config(format!(
                    "Date range is empty: {} is after {}",
                    from.date_naive(),
                    to.date_naive()
                )));
            }
        }

        Ok(DateRange { from, to })
    }

    pub fn is_unbounded(&self) -> bool {
        self.from.is_none() && self.to.is_none()
    }

    /// Inclusive on both ends.
    pub fn contains(&self, time: DateTime<Utc>) -> bool {
        self.from.is_none_or(|from| time >= from) && self.to.is_none_or(|to| time <= to)
    }
}

/// Keep the events whose start falls inside `range`, preserving input order.
pub fn filter_events(
    events: &[EventRecord],
    range: &DateRange,
    options: &ExportOptions,
) -> EventHubResult<Vec<EventRecord>> {
    let mut kept = Vec::with_capacity(events.len());

    for event in events {
        if range.contains(event.start_time(options.timezone)?) {
            kept.push(event.clone());
        }
    }

    tracing::debug!(
        total = events.len(),
        kept = kept.len(),
        "filtered events by date range"
    );

    Ok(kept)
}

/// Parse YYYY-MM-DD as start of day in UTC
fn parse_date_start(s: &str) -> EventHubResult<DateTime<Utc>> {
    Ok(parse_date(s)?.and_time(NaiveTime::MIN).and_utc())
}

/// Parse YYYY-MM-DD as end of day in UTC
fn parse_date_end(s: &str) -> EventHubResult<DateTime<Utc>> {
    parse_date(s)?
        .and_hms_opt(23, 59, 59)
        .map(|dt| dt.and_utc())
        .ok_or_else(|| EventHubError::Config(format!("Invalid end date '{}'", s)))
}

fn parse_date(s: &str) -> EventHubResult<NaiveDate> {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").map_err(|_| {
        EventHubError::Config(format!("Invalid date format '{}'. Expected YYYY-MM-DD", s))
    })
}
