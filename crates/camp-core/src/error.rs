//! Error types for camp-core operations.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum CampError {
    /// A time-of-day string was not a zero-padded 24-hour `HH:MM` value.
    #[error("Invalid time format: '{0}' (expected HH:MM, 00:00-23:59)")]
    InvalidTimeFormat(String),

    #[error("Invalid date: '{0}' (expected YYYY-MM-DD or RFC 3339)")]
    InvalidDate(String),

    #[error("Invalid timezone: {0}")]
    InvalidTimezone(String),

    /// A range whose end precedes its start was passed to a validating constructor.
    #[error("Invalid range: end {end} is before start {start}")]
    InvalidRange { start: String, end: String },

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("{collection}/{id} not found")]
    NotFound { collection: String, id: String },

    #[error("Store error: {0}")]
    Store(String),

    #[error("Decode error: {0}")]
    Decode(#[from] serde_json::Error),

    /// The delete step of an association replacement succeeded but the insert
    /// step did not finish. Re-running the replacement converges.
    #[error(
        "Partial update of {table} for parent {parent_id}: inserted {inserted} of {expected} rows: {source}"
    )]
    PartialUpdate {
        table: String,
        parent_id: String,
        inserted: usize,
        expected: usize,
        #[source]
        source: Box<CampError>,
    },
}

pub type Result<T> = std::result::Result<T, CampError>;
