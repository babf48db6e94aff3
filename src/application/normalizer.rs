// Event normalizer - Merges door/appliance/wifi events into one chart series
use crate::domain::dashboard::DevicesByCategory;
use crate::domain::error::TimelineResult;
use crate::domain::event::{DeviceEvent, EventCategory, EventKind, NormalizedChartEvent};
use crate::domain::telemetry::{SolarPoint, TelemetrySample};
use crate::domain::timestamp::parse_timestamp_ms;
use chrono::DateTime;
use chrono_tz::Tz;
use std::collections::{BTreeMap, BTreeSet};

/// Render epoch milliseconds as `HH:MM:SS` local time.
pub fn format_display_time(timestamp_ms: i64, tz: Tz) -> String {
    match DateTime::from_timestamp_millis(timestamp_ms) {
        Some(utc) => utc.with_timezone(&tz).format("%H:%M:%S").to_string(),
        None => String::from("--:--:--"),
    }
}

/// Normalize every source list into a single ascending series.
///
/// The sort is stable, so events sharing a timestamp keep their input order
/// (doors, then appliances, then wifi, each in source order). A timestamp
/// that does not parse fails the whole batch. Events in a state this build
/// does not know are skipped.
pub fn normalize_events(
    doors: &[DeviceEvent],
    appliances: &[DeviceEvent],
    wifi: &[DeviceEvent],
    tz: Tz,
) -> TimelineResult<Vec<NormalizedChartEvent>> {
    let mut events = Vec::with_capacity(doors.len() + appliances.len() + wifi.len());

    for event in doors.iter().chain(appliances).chain(wifi) {
        if let Some(normalized) = normalize_event(event, tz)? {
            events.push(normalized);
        }
    }

    events.sort_by_key(|e| e.timestamp_ms);

    tracing::debug!(
        "Normalized {} events ({} doors, {} appliances, {} wifi)",
        events.len(),
        doors.len(),
        appliances.len(),
        wifi.len()
    );

    Ok(events)
}

fn normalize_event(event: &DeviceEvent, tz: Tz) -> TimelineResult<Option<NormalizedChartEvent>> {
    let timestamp_ms = parse_timestamp_ms(&event.id, &event.occurred_at)?;

    let Some(kind) = EventKind::from_state(event.state) else {
        tracing::warn!(
            "Skipping event {} from {}: unrecognised {:?} state",
            event.id,
            event.device_name,
            event.category()
        );
        return Ok(None);
    };

    Ok(Some(NormalizedChartEvent {
        id: event.id.clone(),
        device_name: event.device_name.clone(),
        kind,
        category: kind.category(),
        state: kind.state_label(),
        timestamp_ms,
        display_time: format_display_time(timestamp_ms, tz),
        color: kind.color(),
        marker_shape: kind.marker_shape(),
        y_level: kind.y_level(),
    }))
}

/// Solar samples shaped for the chart, ascending by time.
pub fn solar_points(samples: &[TelemetrySample], tz: Tz) -> Vec<SolarPoint> {
    let mut points: Vec<SolarPoint> = samples
        .iter()
        .map(|s| SolarPoint {
            timestamp_ms: s.timestamp_ms,
            display_time: format_display_time(s.timestamp_ms, tz),
            wh: s.watt_hours,
            uv_level: s.uv_level,
        })
        .collect();
    points.sort_by_key(|p| p.timestamp_ms);
    points
}

/// Number of events per (category, state) pair; every kind is present.
pub fn event_counts(events: &[NormalizedChartEvent]) -> BTreeMap<EventKind, usize> {
    let mut counts: BTreeMap<EventKind, usize> = EventKind::ALL.iter().map(|k| (*k, 0)).collect();
    for event in events {
        *counts.entry(event.kind).or_default() += 1;
    }
    counts
}

/// Deduplicated, name-sorted devices for each category.
pub fn devices_by_category(events: &[NormalizedChartEvent]) -> DevicesByCategory {
    let mut grouped: BTreeMap<EventCategory, BTreeSet<&str>> = BTreeMap::new();
    for event in events {
        grouped
            .entry(event.category)
            .or_default()
            .insert(event.device_name.as_str());
    }

    let mut take = |category: EventCategory| -> Vec<String> {
        grouped
            .remove(&category)
            .map(|names| names.into_iter().map(str::to_string).collect())
            .unwrap_or_default()
    };

    DevicesByCategory {
        doors: take(EventCategory::Door),
        appliances: take(EventCategory::Appliance),
        wifi: take(EventCategory::Wifi),
    }
}

/// Every device name across categories, sorted and deduplicated.
pub fn all_device_names(events: &[NormalizedChartEvent]) -> Vec<String> {
    events
        .iter()
        .map(|e| e.device_name.as_str())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::error::TimelineError;
    use crate::domain::event::{ApplianceState, DoorState, EventState, MarkerShape, WifiState};

    fn door(id: &str, name: &str, state: DoorState, at: &str) -> DeviceEvent {
        DeviceEvent::new(id.into(), name.into(), EventState::Door(state), at.into())
    }

    fn appliance(id: &str, name: &str, state: ApplianceState, at: &str) -> DeviceEvent {
        DeviceEvent::new(id.into(), name.into(), EventState::Appliance(state), at.into())
    }

    fn wifi(id: &str, name: &str, state: WifiState, at: &str) -> DeviceEvent {
        DeviceEvent::new(id.into(), name.into(), EventState::Wifi(state), at.into())
    }

    #[test]
    fn test_merges_and_sorts_ascending() {
        let doors = vec![
            door("d1", "Front", DoorState::Open, "100"),
            door("d2", "Front", DoorState::Closed, "200"),
        ];
        let wifis = vec![wifi("w1", "Phone", WifiState::Connected, "150")];

        let events = normalize_events(&doors, &[], &wifis, Tz::UTC).unwrap();
        let times: Vec<i64> = events.iter().map(|e| e.timestamp_ms).collect();
        assert_eq!(times, vec![100, 150, 200]);
        assert_eq!(events.len(), 3);
    }

    #[test]
    fn test_ties_keep_input_order() {
        let doors = vec![door("d1", "Front", DoorState::Open, "500")];
        let apps = vec![appliance("a1", "Dryer", ApplianceState::On, "500")];
        let wifis = vec![wifi("w1", "Phone", WifiState::Disconnected, "500")];

        let events = normalize_events(&doors, &apps, &wifis, Tz::UTC).unwrap();
        let ids: Vec<&str> = events.iter().map(|e| e.id.as_str()).collect();
        assert_eq!(ids, vec!["d1", "a1", "w1"]);
    }

    #[test]
    fn test_visual_attributes_follow_kind() {
        let apps = vec![
            appliance("a1", "Washer", ApplianceState::On, "2025-01-01T00:00:00Z"),
            appliance("a2", "Washer", ApplianceState::Off, "2025-01-01T01:00:00Z"),
        ];
        let events = normalize_events(&[], &apps, &[], Tz::UTC).unwrap();

        assert_eq!(events[0].color, "#3b82f6");
        assert_eq!(events[1].color, "#6b7280");
        assert_eq!(events[0].marker_shape, MarkerShape::Triangle);
        assert_eq!(events[0].y_level, 2.0);
        assert_eq!(events[0].state, "ON");
    }

    #[test]
    fn test_display_time_uses_zone() {
        let doors = vec![door("d1", "Back", DoorState::Open, "2025-03-01T01:02:03Z")];
        let events = normalize_events(&doors, &[], &[], chrono_tz::Australia::Perth).unwrap();
        assert_eq!(events[0].display_time, "09:02:03");
    }

    #[test]
    fn test_unparseable_timestamp_is_an_error() {
        let doors = vec![
            door("d1", "Front", DoorState::Open, "100"),
            door("d2", "Front", DoorState::Closed, "not a time"),
        ];
        let err = normalize_events(&doors, &[], &[], Tz::UTC).unwrap_err();
        assert!(matches!(err, TimelineError::InvalidTimestamp { ref source_id, .. } if source_id == "d2"));
    }

    #[test]
    fn test_epoch_beyond_calendar_is_an_error() {
        let wifi_events = vec![wifi("w1", "Laptop", WifiState::Connected, &i64::MAX.to_string())];
        let err = normalize_events(&[], &[], &wifi_events, Tz::UTC).unwrap_err();
        assert!(matches!(err, TimelineError::InvalidTimestamp { ref source_id, .. } if source_id == "w1"));
    }

    #[test]
    fn test_unknown_state_is_skipped() {
        let doors = vec![
            door("d1", "Front", DoorState::Unknown, "100"),
            door("d2", "Front", DoorState::Closed, "200"),
        ];
        let events = normalize_events(&doors, &[], &[], Tz::UTC).unwrap();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].id, "d2");
    }

    #[test]
    fn test_counts_and_devices() {
        let doors = vec![
            door("d1", "Front", DoorState::Open, "1"),
            door("d2", "Back", DoorState::Open, "2"),
            door("d3", "Front", DoorState::Closed, "3"),
        ];
        let wifis = vec![wifi("w1", "Laptop", WifiState::Connected, "4")];
        let events = normalize_events(&doors, &[], &wifis, Tz::UTC).unwrap();

        let counts = event_counts(&events);
        assert_eq!(counts[&EventKind::DoorOpen], 2);
        assert_eq!(counts[&EventKind::DoorClosed], 1);
        assert_eq!(counts[&EventKind::ApplianceOn], 0);

        let devices = devices_by_category(&events);
        assert_eq!(devices.doors, vec!["Back", "Front"]);
        assert!(devices.appliances.is_empty());
        assert_eq!(devices.wifi, vec!["Laptop"]);

        assert_eq!(all_device_names(&events), vec!["Back", "Front", "Laptop"]);
    }

    #[test]
    fn test_solar_points_sorted() {
        let samples = vec![
            TelemetrySample::new(2_000, 5.0, None),
            TelemetrySample::new(1_000, 3.0, Some(1.5)),
        ];
        let points = solar_points(&samples, Tz::UTC);
        assert_eq!(points[0].timestamp_ms, 1_000);
        assert_eq!(points[0].uv_level, Some(1.5));
        assert_eq!(points[1].display_time, "00:00:02");
    }
}
