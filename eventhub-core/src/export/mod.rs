//! Event export to iCalendar and CSV.
//!
//! [`export`] is a pure mapping from records to a document: no I/O, no hidden
//! state, so identical input always yields identical output. Any record with
//! an unreadable timestamp fails the whole export instead of leaking an
//! invalid value into the document.

mod csv;

use std::fmt;
use std::str::FromStr;

use chrono::Duration;
use chrono_tz::Tz;

use crate::constants::{DEFAULT_EVENT_DURATION_MINUTES, DEFAULT_PRODUCT_ID, DEFAULT_UID_DOMAIN};
use crate::error::{EventHubError, EventHubResult};
use crate::event::EventRecord;
use crate::ics::generate_ics;

pub use self::csv::{CSV_HEADER, generate_csv};

/// Target serialization for [`export`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    /// iCalendar (RFC 5545)
    Ics,
    /// Comma-separated values with a header row
    Csv,
}

impl ExportFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            ExportFormat::Ics => "ics",
            ExportFormat::Csv => "csv",
        }
    }

    pub fn mime_type(&self) -> &'static str {
        match self {
            ExportFormat::Ics => "text/calendar",
            ExportFormat::Csv => "text/csv",
        }
    }

    /// File name offered for a download/export, e.g. `events.ics`.
    pub fn default_file_name(&self) -> String {
        format!("events.{}", self.extension())
    }
}

impl FromStr for ExportFormat {
    type Err = EventHubError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "ics" => Ok(ExportFormat::Ics),
            "csv" => Ok(ExportFormat::Csv),
            _ => Err(EventHubError::UnknownFormat(s.to_string())),
        }
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

/// Knobs that shape the exported documents.
#[derive(Debug, Clone)]
pub struct ExportOptions {
    /// Product name in `PRODID:-//<product_id>//Calendar//EN`
    pub product_id: String,
    /// Suffix of every UID (`<id>@<uid_domain>`)
    pub uid_domain: String,
    /// Length of events without an explicit end
    pub default_duration: Duration,
    /// Zone for naive timestamps and for CSV date/time columns
    pub timezone: Tz,
}

impl Default for ExportOptions {
    fn default() -> Self {
        ExportOptions {
            product_id: DEFAULT_PRODUCT_ID.to_string(),
            uid_domain: DEFAULT_UID_DOMAIN.to_string(),
            default_duration: Duration::minutes(DEFAULT_EVENT_DURATION_MINUTES),
            timezone: Tz::UTC,
        }
    }
}

/// Serialize `events` in `format`.
pub fn export(
    events: &[EventRecord],
    format: ExportFormat,
    options: &ExportOptions,
) -> EventHubResult<String> {
    tracing::debug!(events = events.len(), %format, "exporting events");

    match format {
        ExportFormat::Ics => generate_ics(events, options),
        ExportFormat::Csv => generate_csv(events, options),
    }
}
