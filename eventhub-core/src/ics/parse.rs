//! ICS file parsing using the icalendar crate's parser.

use chrono::{DateTime, NaiveDateTime, NaiveTime, SecondsFormat, TimeZone, Utc};
use chrono_tz::Tz;
use icalendar::{
    CalendarDateTime, DatePerhapsTime,
    parser::{Component, Property, read_calendar, unfold},
};

use super::text::unescape_text;
use crate::error::{EventHubError, EventHubResult};
use crate::event::{EventId, EventRecord};
use crate::export::ExportOptions;

/// Parse every VEVENT of an ICS document into event records.
///
/// VEVENTs without a UID or a readable DTSTART are skipped with a warning.
/// A trailing `@<uid_domain>` is removed from UIDs so that exporting the
/// records again reproduces the original UIDs.
pub fn parse_ics_events(content: &str, options: &ExportOptions) -> EventHubResult<Vec<EventRecord>> {
    let unfolded = unfold(content);
    let calendar = read_calendar(&unfolded).map_err(|e| EventHubError::IcsParse(e.to_string()))?;

    let mut events = Vec::new();
    for vevent in calendar.components.iter().filter(|c| c.name == "VEVENT") {
        match parse_vevent(vevent, options) {
            Some(event) => events.push(event),
            None => tracing::warn!(
                uid = ?vevent.find_prop("UID").map(|p| p.val.to_string()),
                "skipping VEVENT without UID or readable DTSTART"
            ),
        }
    }

    tracing::debug!(events = events.len(), "parsed ICS document");
    Ok(events)
}

fn parse_vevent(vevent: &Component, options: &ExportOptions) -> Option<EventRecord> {
    // Required fields
    let uid = unescape_text(vevent.find_prop("UID")?.val.as_ref());
    let start = to_utc(
        DatePerhapsTime::try_from(vevent.find_prop("DTSTART")?).ok()?,
        options.timezone,
    )?;

    let suffix = format!("@{}", options.uid_domain);
    let id = uid.strip_suffix(&suffix).unwrap_or(&uid).to_string();

    let title = text_prop(vevent, "SUMMARY").unwrap_or_else(|| "(No title)".to_string());

    let end = vevent
        .find_prop("DTEND")
        .and_then(|p| DatePerhapsTime::try_from(p).ok())
        .and_then(|dpt| to_utc(dpt, options.timezone));

    let category = vevent
        .find_prop("CATEGORIES")
        .map(first_category)
        .filter(|c| !c.is_empty());

    Some(EventRecord {
        id: EventId::Text(id),
        title,
        start: to_rfc3339(start),
        end: end.map(to_rfc3339),
        location: text_prop(vevent, "LOCATION"),
        category,
        description: text_prop(vevent, "DESCRIPTION"),
    })
}

fn text_prop(vevent: &Component, name: &str) -> Option<String> {
    vevent
        .find_prop(name)
        .map(|p| unescape_text(p.val.as_ref()))
}

/// First entry of a comma-separated CATEGORIES value, honoring `\,` escapes.
fn first_category(prop: &Property) -> String {
    let raw = prop.val.as_ref();
    let mut end = raw.len();
    let mut escaped = false;

    for (i, ch) in raw.char_indices() {
        match ch {
            '\\' if !escaped => escaped = true,
            ',' if !escaped => {
                end = i;
                break;
            }
            _ => escaped = false,
        }
    }

    unescape_text(raw[..end].trim())
}

/// Resolve an ICS date or date-time to a UTC instant.
///
/// Floating times and all-day dates are read in `tz`; TZID values use the
/// named zone and are dropped when the zone is unknown.
fn to_utc(dpt: DatePerhapsTime, tz: Tz) -> Option<DateTime<Utc>> {
    match dpt {
        DatePerhapsTime::Date(d) => local_to_utc(&d.and_time(NaiveTime::MIN), tz),
        DatePerhapsTime::DateTime(cal_dt) => match cal_dt {
            CalendarDateTime::Utc(dt) => Some(dt),
            CalendarDateTime::Floating(naive) => local_to_utc(&naive, tz),
            CalendarDateTime::WithTimezone { date_time, tzid } => {
                let zone: Tz = tzid.parse().ok()?;
                local_to_utc(&date_time, zone)
            }
        },
    }
}

fn local_to_utc(naive: &NaiveDateTime, tz: Tz) -> Option<DateTime<Utc>> {
    tz.from_local_datetime(naive)
        .earliest()
        .map(|dt| dt.with_timezone(&Utc))
}

fn to_rfc3339(time: DateTime<Utc>) -> String {
    time.to_rfc3339_opts(SecondsFormat::Secs, true)
}
