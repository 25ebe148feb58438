//! Core types for the eventhub ecosystem.
//!
//! This crate provides:
//! - `EventRecord`, the event shape served by the event feed
//! - `export`, which serializes records to iCalendar or CSV
//! - `ics`, ICS generation and parsing
//! - `DateRange` filtering and the global `EventHubConfig`

pub mod config;
pub mod constants;
pub mod date_range;
pub mod error;
pub mod event;
pub mod export;
pub mod ics;

pub use self::config::EventHubConfig;
pub use date_range::{DateRange, filter_events};
pub use error::{EventHubError, EventHubResult};
pub use event::{EventId, EventRecord};
pub use export::{ExportFormat, ExportOptions, export};
