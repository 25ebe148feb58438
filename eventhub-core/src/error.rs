//! Error types for the eventhub ecosystem.

use thiserror::Error;

/// Errors that can occur in eventhub operations.
#[derive(Error, Debug)]
pub enum EventHubError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Unknown export format '{0}' (expected 'ics' or 'csv')")]
    UnknownFormat(String),

    #[error("Event '{id}' has an invalid {field} timestamp: '{value}'")]
    InvalidTimestamp {
        id: String,
        field: &'static str,
        value: String,
    },

    #[error("ICS parse error: {0}")]
    IcsParse(String),

    #[error("CSV error: {0}")]
    Csv(String),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for eventhub operations.
pub type EventHubResult<T> = Result<T, EventHubError>;
