// Timestamp parsing shared by events and samples
use super::error::{TimelineError, TimelineResult};
use chrono::{DateTime, Utc};

/// Accepts RFC3339 strings or epoch milliseconds written as an integer.
/// Millisecond values outside chrono's representable range are rejected.
pub fn parse_timestamp(source_id: &str, raw: &str) -> TimelineResult<DateTime<Utc>> {
    let invalid = || TimelineError::InvalidTimestamp {
        source_id: source_id.to_string(),
        value: raw.to_string(),
    };

    let trimmed = raw.trim();
    if let Ok(millis) = trimmed.parse::<i64>() {
        return DateTime::from_timestamp_millis(millis).ok_or_else(invalid);
    }
    DateTime::parse_from_rfc3339(trimmed)
        .map(|t| t.with_timezone(&Utc))
        .map_err(|_| invalid())
}

pub fn parse_timestamp_ms(source_id: &str, raw: &str) -> TimelineResult<i64> {
    parse_timestamp(source_id, raw).map(|t| t.timestamp_millis())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_rfc3339_and_epoch() {
        assert_eq!(parse_timestamp_ms("a", "1970-01-01T00:00:01Z").unwrap(), 1000);
        assert_eq!(parse_timestamp_ms("a", "1970-01-01T08:00:01+08:00").unwrap(), 1000);
        assert_eq!(parse_timestamp_ms("a", "1500").unwrap(), 1500);
    }

    #[test]
    fn test_epoch_millis_outside_calendar_range_is_rejected() {
        let err = parse_timestamp_ms("e1", "9000000000000000").unwrap_err();
        assert!(matches!(err, TimelineError::InvalidTimestamp { ref value, .. } if value == "9000000000000000"));
        assert!(parse_timestamp_ms("e1", &i64::MAX.to_string()).is_err());
        assert!(parse_timestamp_ms("e1", &i64::MIN.to_string()).is_err());
    }

    #[test]
    fn test_parse_failure_names_source() {
        let err = parse_timestamp_ms("door-1", "yesterday").unwrap_err();
        assert_eq!(
            err,
            TimelineError::InvalidTimestamp {
                source_id: "door-1".to_string(),
                value: "yesterday".to_string(),
            }
        );
    }
}
