// Time window domain model
use super::error::{TimelineError, TimelineResult};
use serde::{Deserialize, Serialize};

/// A closed time interval in epoch milliseconds. `start_ms <= end_ms` always holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", try_from = "RawWindow")]
pub struct TimeWindow {
    start_ms: i64,
    end_ms: i64,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawWindow {
    start_ms: i64,
    end_ms: i64,
}

impl TryFrom<RawWindow> for TimeWindow {
    type Error = TimelineError;

    fn try_from(raw: RawWindow) -> TimelineResult<Self> {
        TimeWindow::new(raw.start_ms, raw.end_ms)
    }
}

impl TimeWindow {
    pub fn new(start_ms: i64, end_ms: i64) -> TimelineResult<Self> {
        if start_ms > end_ms {
            return Err(TimelineError::InvalidWindow { start_ms, end_ms });
        }
        Ok(Self { start_ms, end_ms })
    }

    /// Builds a window from two edges in either order.
    pub fn spanning(a: i64, b: i64) -> Self {
        Self {
            start_ms: a.min(b),
            end_ms: a.max(b),
        }
    }

    pub fn start_ms(&self) -> i64 {
        self.start_ms
    }

    pub fn end_ms(&self) -> i64 {
        self.end_ms
    }

    pub fn width_ms(&self) -> i64 {
        self.end_ms.saturating_sub(self.start_ms)
    }

    pub fn midpoint_ms(&self) -> i64 {
        self.start_ms + self.width_ms() / 2
    }

    /// Inclusive on both ends.
    pub fn contains(&self, timestamp_ms: i64) -> bool {
        timestamp_ms >= self.start_ms && timestamp_ms <= self.end_ms
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejects_inverted_window() {
        assert_eq!(
            TimeWindow::new(10, 5),
            Err(TimelineError::InvalidWindow { start_ms: 10, end_ms: 5 })
        );
        assert!(TimeWindow::new(5, 5).is_ok());
    }

    #[test]
    fn test_contains_is_inclusive() {
        let window = TimeWindow::new(100, 200).unwrap();
        assert!(window.contains(100));
        assert!(window.contains(200));
        assert!(!window.contains(201));
        assert_eq!(window.midpoint_ms(), 150);
    }

    #[test]
    fn test_deserialize_validates() {
        let ok: TimeWindow = serde_json::from_str(r#"{"startMs":1,"endMs":2}"#).unwrap();
        assert_eq!(ok.width_ms(), 1);
        assert!(serde_json::from_str::<TimeWindow>(r#"{"startMs":3,"endMs":2}"#).is_err());
    }
}
