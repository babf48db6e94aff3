// Telemetry data domain models
use serde::{Deserialize, Serialize};

/// A solar generation reading.
#[derive(Debug, Clone, PartialEq)]
pub struct TelemetrySample {
    pub timestamp_ms: i64,
    pub watt_hours: f64,
    pub uv_level: Option<f64>,
}

impl TelemetrySample {
    pub fn new(timestamp_ms: i64, watt_hours: f64, uv_level: Option<f64>) -> Self {
        Self {
            timestamp_ms,
            watt_hours,
            uv_level,
        }
    }
}

/// Solar sample shaped for the line chart.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SolarPoint {
    pub timestamp_ms: i64,
    pub display_time: String,
    pub wh: f64,
    pub uv_level: Option<f64>,
}

/// Line series drawn over the solar chart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SolarSeries {
    Solar,
    Uv,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SeriesFlags {
    pub solar: bool,
    pub uv: bool,
}

impl Default for SeriesFlags {
    fn default() -> Self {
        Self { solar: true, uv: true }
    }
}

impl SeriesFlags {
    fn slot(&mut self, series: SolarSeries) -> &mut bool {
        match series {
            SolarSeries::Solar => &mut self.solar,
            SolarSeries::Uv => &mut self.uv,
        }
    }

    pub fn set(&mut self, series: SolarSeries, visible: bool) {
        *self.slot(series) = visible;
    }

    pub fn toggle(&mut self, series: SolarSeries) {
        let slot = self.slot(series);
        *slot = !*slot;
    }

    pub fn any(&self) -> bool {
        self.solar || self.uv
    }
}

/// Metered household consumption for one interval.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EnergyConsumption {
    pub id: String,
    pub used: f64,
    pub solar_exported: f64,
    pub time: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DailyEnergyBucket {
    pub day_label: String,
    pub used_kwh: f64,
    pub solar_exported_kwh: f64,
}

impl DailyEnergyBucket {
    pub fn new(day_label: String) -> Self {
        Self {
            day_label,
            used_kwh: 0.0,
            solar_exported_kwh: 0.0,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SolarCurrent {
    pub today_production_kwh: Option<f64>,
    pub yesterday_production_kwh: Option<f64>,
    pub current_production_wh: Option<f64>,
    pub uv_level: Option<f64>,
    pub statistics: Option<SolarStatistics>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SolarStatistics {
    pub averages: SolarAverages,
}

/// Running production averages in watts.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SolarAverages {
    pub last15_mins: Option<f64>,
    pub last1_hour: Option<f64>,
}

/// Raw room reading; every field may be missing.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct EnvironmentReading {
    pub temperature: Option<f64>,
    pub humidity: Option<f64>,
    pub pressure: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EnvironmentCard {
    pub room: String,
    pub temperature: f64,
    pub humidity: f64,
    pub pressure: f64,
}

impl EnvironmentCard {
    /// `key` is the backend field name, e.g. `livingRoom`.
    pub fn from_reading(key: &str, reading: Option<&EnvironmentReading>) -> Self {
        let reading = reading.cloned().unwrap_or_default();
        Self {
            room: room_label(key),
            temperature: reading.temperature.unwrap_or(0.0),
            humidity: reading.humidity.unwrap_or(0.0),
            pressure: reading.pressure.unwrap_or(0.0),
        }
    }
}

/// Convert "livingRoom" to "Living Room"
fn room_label(key: &str) -> String {
    let mut label = String::with_capacity(key.len() + 4);
    for (i, c) in key.chars().enumerate() {
        if i == 0 {
            label.extend(c.to_uppercase());
        } else if c.is_uppercase() {
            label.push(' ');
            label.push(c);
        } else {
            label.push(c);
        }
    }
    label
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ForecastDay {
    pub date_time: String,
    pub code: Option<i64>,
    pub description: Option<String>,
    pub emoji: Option<String>,
    pub min: Option<f64>,
    pub max: Option<f64>,
    pub uv: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GroceryProduct {
    pub name: String,
    pub price: Option<f64>,
}
