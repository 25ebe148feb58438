//! Where events are read from.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use eventhub_core::ics::parse_ics_events;
use eventhub_core::{EventRecord, ExportOptions};
use tokio::io::AsyncReadExt;

/// Event input: a file or stdin.
#[derive(Debug, Clone, PartialEq)]
pub enum Source {
    Stdin,
    File(PathBuf),
}

impl Source {
    /// `None` and `-` both mean stdin.
    pub fn from_arg(arg: Option<&Path>) -> Self {
        match arg {
            Some(path) if path != Path::new("-") => Source::File(path.to_path_buf()),
            _ => Source::Stdin,
        }
    }

    pub async fn read_events(&self, options: &ExportOptions) -> Result<Vec<EventRecord>> {
        let content = match self {
            Source::Stdin => {
                let mut buf = String::new();
                tokio::io::stdin()
                    .read_to_string(&mut buf)
                    .await
                    .context("Failed to read events from stdin")?;
                buf
            }
            Source::File(path) => tokio::fs::read_to_string(path)
                .await
                .with_context(|| format!("Failed to read {}", path.display()))?,
        };

        let events = parse_events(&content, self.is_ics_file(), options)?;
        tracing::info!(source = %self, events = events.len(), "loaded events");
        Ok(events)
    }

    fn is_ics_file(&self) -> bool {
        match self {
            Source::File(path) => path
                .extension()
                .is_some_and(|ext| ext.eq_ignore_ascii_case("ics")),
            Source::Stdin => false,
        }
    }
}

impl std::fmt::Display for Source {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Source::Stdin => f.write_str("stdin"),
            Source::File(path) => write!(f, "{}", path.display()),
        }
    }
}

/// Parse an events document: ICS when flagged or when it starts with
/// `BEGIN:VCALENDAR`, otherwise a JSON array of records.
pub fn parse_events(content: &str, is_ics: bool, options: &ExportOptions) -> Result<Vec<EventRecord>> {
    if is_ics || content.trim_start().starts_with("BEGIN:VCALENDAR") {
        parse_ics_events(content, options).context("Could not read events from ICS input")
    } else {
        EventRecord::list_from_json(content).context("Could not read events from JSON input")
    }
}
