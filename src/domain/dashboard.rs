// Dashboard domain models
use super::event::{DeviceEvent, EventCategory, EventKind, NormalizedChartEvent};
use super::telemetry::{
    DailyEnergyBucket, EnergyConsumption, EnvironmentCard, EnvironmentReading, ForecastDay,
    GroceryProduct, SeriesFlags, SolarCurrent, SolarPoint, TelemetrySample,
};
use super::window::TimeWindow;
use serde::Serialize;
use std::collections::BTreeMap;

/// Everything one dashboard query returns.
#[derive(Debug, Clone, Default)]
pub struct DashboardSnapshot {
    pub doors: Vec<DeviceEvent>,
    pub appliances: Vec<DeviceEvent>,
    pub wifi: Vec<DeviceEvent>,
    pub solar_history: Vec<TelemetrySample>,
    pub solar_current: SolarCurrent,
    /// Keyed by backend room field name, in query order
    pub environment: Vec<(String, Option<EnvironmentReading>)>,
    pub energy_history: Vec<EnergyConsumption>,
}

/// What the e-ink display query returns.
#[derive(Debug, Clone, Default)]
pub struct EinkSnapshot {
    pub solar_history: Vec<TelemetrySample>,
    pub solar_current: SolarCurrent,
    pub forecast: Vec<ForecastDay>,
    pub products: Vec<GroceryProduct>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Tick {
    pub timestamp_ms: i64,
    pub label: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct DevicesByCategory {
    pub doors: Vec<String>,
    pub appliances: Vec<String>,
    pub wifi: Vec<String>,
}

impl DevicesByCategory {
    pub fn for_category(&self, category: EventCategory) -> &[String] {
        match category {
            EventCategory::Door => &self.doors,
            EventCategory::Appliance => &self.appliances,
            EventCategory::Wifi => &self.wifi,
        }
    }
}

/// Chart-ready timeline for the overview tab.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Timeline {
    pub window: TimeWindow,
    pub full_extent: TimeWindow,
    pub zoomed: bool,
    pub dragging: bool,
    /// A newer fetch is still in flight
    pub loading: bool,
    pub ticks: Vec<Tick>,
    pub events: Vec<NormalizedChartEvent>,
    pub solar: Vec<SolarPoint>,
    pub series: SeriesFlags,
    pub event_counts: BTreeMap<EventKind, usize>,
    pub devices: DevicesByCategory,
    pub selected_devices: Vec<String>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EnergyReport {
    pub days: Vec<DailyEnergyBucket>,
    pub total_cost: f64,
    pub total_solar_value: f64,
    pub solar_current: SolarCurrent,
}

#[derive(Debug, Clone, Serialize)]
pub struct Overview {
    pub environment: Vec<EnvironmentCard>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EinkSummary {
    pub location: String,
    pub solar: Vec<SolarPoint>,
    pub solar_current: SolarCurrent,
    pub forecast: Vec<ForecastDay>,
    pub products: Vec<GroceryProduct>,
}
