//! ICS file generation.

use chrono::{DateTime, Utc};

use super::text::{escape_text, fold_line};
use crate::error::EventHubResult;
use crate::event::EventRecord;
use crate::export::ExportOptions;

/// Generate a VCALENDAR document with one VEVENT per record, in input order.
///
/// Lines are joined with CRLF and the document ends with `END:VCALENDAR`.
/// No DTSTAMP is written, so the output depends on the input alone.
pub fn generate_ics(events: &[EventRecord], options: &ExportOptions) -> EventHubResult<String> {
    let mut lines = vec![
        "BEGIN:VCALENDAR".to_string(),
        "VERSION:2.0".to_string(),
        text_property(
            "PRODID",
            &format!("-//{}//Calendar//EN", options.product_id),
        ),
    ];

    for event in events {
        let start = event.start_time(options.timezone)?;
        let end = event.end_time(options.timezone, options.default_duration)?;

        lines.push("BEGIN:VEVENT".to_string());
        lines.push(text_property(
            "UID",
            &format!("{}@{}", event.id, options.uid_domain),
        ));
        lines.push(format!("DTSTART:{}", format_utc(start)));
        lines.push(format!("DTEND:{}", format_utc(end)));
        lines.push(text_property("SUMMARY", &event.title));
        lines.push(text_property("DESCRIPTION", event.description_str()));
        lines.push(text_property("LOCATION", event.location_str()));
        lines.push("END:VEVENT".to_string());
    }

    lines.push("END:VCALENDAR".to_string());

    Ok(lines.join("\r\n"))
}

/// UTC date-time in basic format, e.g. `20240301T150000Z`
fn format_utc(time: DateTime<Utc>) -> String {
    time.format("%Y%m%dT%H%M%SZ").to_string()
}

fn text_property(name: &str, value: &str) -> String {
    fold_line(&format!("{}:{}", name, escape_text(value)))
}
