// Typed errors for the reshaping pipeline
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum TimelineError {
    /// Event or sample timestamp could not be parsed
    #[error("Invalid timestamp {value:?} on {source_id}")]
    InvalidTimestamp { source_id: String, value: String },

    /// Configured time zone is not an IANA name
    #[error("Unknown time zone: {0}")]
    InvalidTimeZone(String),

    /// Window with start after end
    #[error("Invalid time window: start {start_ms} is after end {end_ms}")]
    InvalidWindow { start_ms: i64, end_ms: i64 },
}

pub type TimelineResult<T> = Result<T, TimelineError>;
