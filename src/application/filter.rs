// Device/state filter - Decides which normalized events are rendered
use crate::domain::event::{EventKind, NormalizedChartEvent};
use crate::domain::telemetry::{SeriesFlags, SolarPoint};
use crate::domain::window::TimeWindow;
use serde::Serialize;
use std::collections::BTreeSet;

/// One independent visibility flag per (category, state) pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StateFlags {
    pub doors_open: bool,
    pub doors_closed: bool,
    pub appliances_on: bool,
    pub appliances_off: bool,
    pub wifi_connected: bool,
    pub wifi_disconnected: bool,
}

impl Default for StateFlags {
    fn default() -> Self {
        Self {
            doors_open: true,
            doors_closed: true,
            appliances_on: true,
            appliances_off: true,
            wifi_connected: true,
            wifi_disconnected: true,
        }
    }
}

impl StateFlags {
    fn slot(&mut self, kind: EventKind) -> &mut bool {
        match kind {
            EventKind::DoorOpen => &mut self.doors_open,
            EventKind::DoorClosed => &mut self.doors_closed,
            EventKind::ApplianceOn => &mut self.appliances_on,
            EventKind::ApplianceOff => &mut self.appliances_off,
            EventKind::WifiConnected => &mut self.wifi_connected,
            EventKind::WifiDisconnected => &mut self.wifi_disconnected,
        }
    }

    pub fn is_enabled(&self, kind: EventKind) -> bool {
        match kind {
            EventKind::DoorOpen => self.doors_open,
            EventKind::DoorClosed => self.doors_closed,
            EventKind::ApplianceOn => self.appliances_on,
            EventKind::ApplianceOff => self.appliances_off,
            EventKind::WifiConnected => self.wifi_connected,
            EventKind::WifiDisconnected => self.wifi_disconnected,
        }
    }

    pub fn set(&mut self, kind: EventKind, visible: bool) {
        *self.slot(kind) = visible;
    }

    pub fn toggle(&mut self, kind: EventKind) {
        let slot = self.slot(kind);
        *slot = !*slot;
    }
}

/// Visibility toggles plus the device allow-list. An empty allow-list shows every device.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VisibilityState {
    pub states: StateFlags,
    pub series: SeriesFlags,
    devices: BTreeSet<String>,
}

impl VisibilityState {
    pub fn selected_devices(&self) -> impl Iterator<Item = &str> {
        self.devices.iter().map(String::as_str)
    }

    pub fn shows_device(&self, name: &str) -> bool {
        self.devices.is_empty() || self.devices.contains(name)
    }

    pub fn toggle_device(&mut self, name: &str) {
        if !self.devices.remove(name) {
            self.devices.insert(name.to_string());
        }
    }

    /// Replace the whole allow-list.
    pub fn select_devices<I, S>(&mut self, names: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.devices = names.into_iter().map(Into::into).collect();
    }

    pub fn clear_devices(&mut self) {
        self.devices.clear();
    }

    /// Add one category's devices to the allow-list.
    pub fn select_category(&mut self, names: &[String]) {
        self.devices.extend(names.iter().cloned());
    }

    /// Remove one category's devices from the allow-list.
    pub fn clear_category(&mut self, names: &[String]) {
        for name in names {
            self.devices.remove(name);
        }
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }

    pub fn passes(&self, event: &NormalizedChartEvent, window: &TimeWindow) -> bool {
        window.contains(event.timestamp_ms)
            && self.states.is_enabled(event.kind)
            && self.shows_device(&event.device_name)
    }
}

/// Events inside `window` that the visibility state allows, order preserved.
pub fn filter_events(
    events: &[NormalizedChartEvent],
    visibility: &VisibilityState,
    window: &TimeWindow,
) -> Vec<NormalizedChartEvent> {
    let visible: Vec<NormalizedChartEvent> = events
        .iter()
        .filter(|e| visibility.passes(e, window))
        .cloned()
        .collect();

    tracing::debug!(
        "Filtered {} of {} events to window {}..{}",
        visible.len(),
        events.len(),
        window.start_ms(),
        window.end_ms()
    );

    visible
}

/// Solar points inside `window`; none at all once both series are hidden.
pub fn filter_solar(
    points: Vec<SolarPoint>,
    visibility: &VisibilityState,
    window: &TimeWindow,
) -> Vec<SolarPoint> {
    if !visibility.series.any() {
        return Vec::new();
    }
    points
        .into_iter()
        .filter(|p| window.contains(p.timestamp_ms))
        .collect()
}
