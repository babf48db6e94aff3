// Tick generator - Evenly spaced axis ticks snapped to readable intervals
use crate::domain::dashboard::Tick;
use crate::domain::window::TimeWindow;
use chrono::DateTime;
use chrono_tz::Tz;

const MINUTE_MS: i64 = 60 * 1000;
const HOUR_MS: i64 = 60 * MINUTE_MS;

pub const TARGET_TICKS: i64 = 8;

/// Candidate intervals, smallest first.
pub const TICK_INTERVALS_MS: [i64; 9] = [
    MINUTE_MS,
    5 * MINUTE_MS,
    15 * MINUTE_MS,
    30 * MINUTE_MS,
    HOUR_MS,
    2 * HOUR_MS,
    6 * HOUR_MS,
    12 * HOUR_MS,
    24 * HOUR_MS,
];

/// Smallest candidate covering an eighth of the window, else the largest.
pub fn choose_interval(window: &TimeWindow) -> i64 {
    let raw = window.width_ms() as f64 / TARGET_TICKS as f64;
    TICK_INTERVALS_MS
        .iter()
        .copied()
        .find(|interval| *interval as f64 >= raw)
        .unwrap_or(TICK_INTERVALS_MS[TICK_INTERVALS_MS.len() - 1])
}

/// Tick timestamps inside `window`, on multiples of the chosen interval.
pub fn generate_ticks(window: &TimeWindow) -> Vec<i64> {
    let interval = choose_interval(window);
    let first = window.start_ms().div_euclid(interval) * interval;
    let first = if first < window.start_ms() {
        first.checked_add(interval)
    } else {
        Some(first)
    };

    let mut ticks = Vec::new();
    let mut next = first;
    while let Some(tick) = next.filter(|t| *t <= window.end_ms()) {
        ticks.push(tick);
        next = tick.checked_add(interval);
    }
    ticks
}

/// Axis label, `HH:MM` in the display zone.
pub fn format_tick(timestamp_ms: i64, tz: Tz) -> String {
    DateTime::from_timestamp_millis(timestamp_ms)
        .map(|t| t.with_timezone(&tz).format("%H:%M").to_string())
        .unwrap_or_default()
}

pub fn labelled_ticks(window: &TimeWindow, tz: Tz) -> Vec<Tick> {
    generate_ticks(window)
        .into_iter()
        .map(|timestamp_ms| Tick {
            timestamp_ms,
            label: format_tick(timestamp_ms, tz),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_four_hour_window_uses_thirty_minutes() {
        let start = 1_700_000_000_000;
        let window = TimeWindow::new(start, start + 4 * HOUR_MS).unwrap();
        let interval = choose_interval(&window);
        assert_eq!(interval, 30 * MINUTE_MS);

        let ticks = generate_ticks(&window);
        assert!(ticks.windows(2).all(|pair| pair[1] - pair[0] == interval));
        assert!(ticks[0] >= start && ticks[0] - start < interval);
        assert_eq!(ticks[0] % interval, 0);
        assert!(*ticks.last().unwrap() <= window.end_ms());
    }

    #[test]
    fn test_tick_on_exact_boundary() {
        let window = TimeWindow::new(HOUR_MS, 9 * HOUR_MS).unwrap();
        let ticks = generate_ticks(&window);
        assert_eq!(ticks.first(), Some(&HOUR_MS));
        assert_eq!(ticks.last(), Some(&(9 * HOUR_MS)));
        assert_eq!(ticks.len(), 9);
    }

    #[test]
    fn test_wide_window_falls_back_to_largest_interval() {
        let window = TimeWindow::new(0, 14 * 24 * HOUR_MS).unwrap();
        assert_eq!(choose_interval(&window), 24 * HOUR_MS);
        assert_eq!(generate_ticks(&window).len(), 15);
    }

    #[test]
    fn test_narrow_window_uses_one_minute() {
        let window = TimeWindow::new(30_000, 30_000 + 3 * MINUTE_MS).unwrap();
        assert_eq!(choose_interval(&window), MINUTE_MS);
        assert_eq!(generate_ticks(&window), vec![MINUTE_MS, 2 * MINUTE_MS, 3 * MINUTE_MS]);
    }

    #[test]
    fn test_negative_start_rounds_up() {
        let window = TimeWindow::new(-90_000, 90_000).unwrap();
        assert_eq!(generate_ticks(&window), vec![-MINUTE_MS, 0, MINUTE_MS]);
    }

    #[test]
    fn test_window_ending_at_i64_max_stops_without_overflow() {
        let window = TimeWindow::new(i64::MAX - 3 * MINUTE_MS, i64::MAX).unwrap();
        let ticks = generate_ticks(&window);
        assert_eq!(ticks.len(), 3);
        assert!(ticks.windows(2).all(|pair| pair[1] - pair[0] == MINUTE_MS));
    }

    #[test]
    fn test_deterministic() {
        let window = TimeWindow::new(123_456, 123_456 + 7 * HOUR_MS).unwrap();
        assert_eq!(generate_ticks(&window), generate_ticks(&window));
    }

    #[test]
    fn test_labels_in_zone() {
        let window = TimeWindow::new(0, 30 * MINUTE_MS).unwrap();
        let ticks = labelled_ticks(&window, chrono_tz::Australia::Perth);
        assert_eq!(ticks[0].label, "08:00");
    }
}
