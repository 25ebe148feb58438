//! CSV export.

use ::csv::{QuoteStyle, Terminator, WriterBuilder};
use chrono::{DateTime, TimeZone};

use crate::error::{EventHubError, EventHubResult};
use crate::event::EventRecord;
use crate::export::ExportOptions;

/// Header row, written unquoted.
pub const CSV_HEADER: &str = "Title,Date,Time,Location,Category,Description";

/// Generate a CSV document: the header row plus one fully quoted row per event.
///
/// Rows are separated by `\n` with no trailing newline, so an empty input
/// yields exactly [`CSV_HEADER`].
pub fn generate_csv(events: &[EventRecord], options: &ExportOptions) -> EventHubResult<String> {
    let mut writer = WriterBuilder::new()
        .quote_style(QuoteStyle::Always)
        .terminator(Terminator::Any(b'\n'))
        .from_writer(Vec::new());

    for event in events {
        let start = event
            .start_time(options.timezone)?
            .with_timezone(&options.timezone);
        let date = format_long_date(&start);
        let time = format_clock_time(&start);

        writer
            .write_record([
                event.title.as_str(),
                date.as_str(),
                time.as_str(),
                event.location_str(),
                event.category_str(),
                event.description_str(),
            ])
            .map_err(|e| EventHubError::Csv(e.to_string()))?;
    }

    let body = writer
        .into_inner()
        .map_err(|e| EventHubError::Csv(e.to_string()))?;
    let body = String::from_utf8(body).map_err(|e| EventHubError::Csv(e.to_string()))?;

    let mut output = String::with_capacity(CSV_HEADER.len() + body.len() + 1);
    output.push_str(CSV_HEADER);
    if let Some(rows) = body.strip_suffix('\n') {
        output.push('\n');
        output.push_str(rows);
    }

    Ok(output)
}

/// e.g. "Friday, March 1, 2024"
fn format_long_date<Tz: TimeZone>(time: &DateTime<Tz>) -> String
where
    Tz::Offset: std::fmt::Display,
{
    time.format("%A, %B %-d, %Y").to_string()
}

/// e.g. "03:00 PM"
fn format_clock_time<Tz: TimeZone>(time: &DateTime<Tz>) -> String
where
    Tz::Offset: std::fmt::Display,
{
    time.format("%I:%M %p").to_string()
}
