//! ICS document generation and parsing.
//!
//! This module handles reading and writing .ics files according to RFC 5545.

mod generate;
mod parse;
mod text;

pub use generate::generate_ics;
pub use parse::parse_ics_events;
