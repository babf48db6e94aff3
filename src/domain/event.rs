// Device event domain models
use serde::{Deserialize, Serialize};

/// Scatter lane for door events.
pub const DOOR_LANE: f64 = 3.0;
/// Scatter lane for appliance events.
pub const APPLIANCE_LANE: f64 = 2.0;
/// Scatter lane for WiFi events.
pub const WIFI_LANE: f64 = 1.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EventCategory {
    Door,
    Appliance,
    Wifi,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DoorState {
    Open,
    Closed,
    #[serde(other)]
    Unknown,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ApplianceState {
    On,
    Off,
    #[serde(other)]
    Unknown,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum WifiState {
    Connected,
    Disconnected,
    #[serde(other)]
    Unknown,
}

/// State of a device event, carrying its category.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventState {
    Door(DoorState),
    Appliance(ApplianceState),
    Wifi(WifiState),
}

impl EventState {
    pub fn category(&self) -> EventCategory {
        match self {
            EventState::Door(_) => EventCategory::Door,
            EventState::Appliance(_) => EventCategory::Appliance,
            EventState::Wifi(_) => EventCategory::Wifi,
        }
    }
}

/// A single observed device transition as received from the backend.
#[derive(Debug, Clone)]
pub struct DeviceEvent {
    pub id: String,
    pub device_name: String,
    pub state: EventState,
    /// Raw timestamp: RFC3339 or epoch milliseconds
    pub occurred_at: String,
}

impl DeviceEvent {
    pub fn new(id: String, device_name: String, state: EventState, occurred_at: String) -> Self {
        Self {
            id,
            device_name,
            state,
            occurred_at,
        }
    }

    pub fn category(&self) -> EventCategory {
        self.state.category()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum MarkerShape {
    Circle,
    Triangle,
    Square,
}

/// Every renderable (category, state) pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum EventKind {
    DoorOpen,
    DoorClosed,
    ApplianceOn,
    ApplianceOff,
    WifiConnected,
    WifiDisconnected,
}

impl EventKind {
    pub const ALL: [EventKind; 6] = [
        EventKind::DoorOpen,
        EventKind::DoorClosed,
        EventKind::ApplianceOn,
        EventKind::ApplianceOff,
        EventKind::WifiConnected,
        EventKind::WifiDisconnected,
    ];

    /// `None` for the forward-compatibility sentinels.
    pub fn from_state(state: EventState) -> Option<Self> {
        match state {
            EventState::Door(DoorState::Open) => Some(EventKind::DoorOpen),
            EventState::Door(DoorState::Closed) => Some(EventKind::DoorClosed),
            EventState::Appliance(ApplianceState::On) => Some(EventKind::ApplianceOn),
            EventState::Appliance(ApplianceState::Off) => Some(EventKind::ApplianceOff),
            EventState::Wifi(WifiState::Connected) => Some(EventKind::WifiConnected),
            EventState::Wifi(WifiState::Disconnected) => Some(EventKind::WifiDisconnected),
            EventState::Door(DoorState::Unknown)
            | EventState::Appliance(ApplianceState::Unknown)
            | EventState::Wifi(WifiState::Unknown) => None,
        }
    }

    pub fn category(&self) -> EventCategory {
        match self {
            EventKind::DoorOpen | EventKind::DoorClosed => EventCategory::Door,
            EventKind::ApplianceOn | EventKind::ApplianceOff => EventCategory::Appliance,
            EventKind::WifiConnected | EventKind::WifiDisconnected => EventCategory::Wifi,
        }
    }

    /// Wire name of the state, as the backend spells it.
    pub fn state_label(&self) -> &'static str {
        match self {
            EventKind::DoorOpen => "OPEN",
            EventKind::DoorClosed => "CLOSED",
            EventKind::ApplianceOn => "ON",
            EventKind::ApplianceOff => "OFF",
            EventKind::WifiConnected => "CONNECTED",
            EventKind::WifiDisconnected => "DISCONNECTED",
        }
    }

    pub fn color(&self) -> &'static str {
        match self {
            EventKind::DoorOpen => "#cc6666",
            EventKind::DoorClosed => "#22c55e",
            EventKind::ApplianceOn => "#3b82f6",
            EventKind::ApplianceOff => "#6b7280",
            EventKind::WifiConnected => "#8b5cf6",
            EventKind::WifiDisconnected => "#06b6d4",
        }
    }

    pub fn marker_shape(&self) -> MarkerShape {
        match self.category() {
            EventCategory::Door => MarkerShape::Circle,
            EventCategory::Appliance => MarkerShape::Triangle,
            EventCategory::Wifi => MarkerShape::Square,
        }
    }

    pub fn y_level(&self) -> f64 {
        match self.category() {
            EventCategory::Door => DOOR_LANE,
            EventCategory::Appliance => APPLIANCE_LANE,
            EventCategory::Wifi => WIFI_LANE,
        }
    }
}

/// Chart-ready view of a [`DeviceEvent`].
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NormalizedChartEvent {
    pub id: String,
    pub device_name: String,
    pub kind: EventKind,
    pub category: EventCategory,
    pub state: &'static str,
    pub timestamp_ms: i64,
    pub display_time: String,
    pub color: &'static str,
    pub marker_shape: MarkerShape,
    pub y_level: f64,
}
