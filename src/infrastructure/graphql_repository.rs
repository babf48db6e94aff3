// GraphQL repository implementation
use crate::application::telemetry_repository::TelemetryRepository;
use crate::domain::dashboard::{DashboardSnapshot, EinkSnapshot};
use crate::domain::event::{ApplianceState, DeviceEvent, DoorState, EventState, WifiState};
use crate::domain::telemetry::{
    EnergyConsumption, EnvironmentReading, ForecastDay, GroceryProduct, SolarCurrent,
    TelemetrySample,
};
use crate::domain::timestamp::parse_timestamp_ms;
use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::{DateTime, SecondsFormat, Utc};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::{json, Value};
use std::time::Duration;

const DASHBOARD_QUERY: &str = r#"
query DashboardQuery($since: DateTime!) {
  events(input: { since: $since }) {
    doors { name time state id }
    appliances { name time state id }
    wifi { name time state id }
  }
  environment {
    outdoor { temperature humidity pressure }
    livingRoom { temperature humidity pressure }
    bedroom { temperature humidity pressure }
    laundry { temperature humidity pressure }
  }
  solar(input: { since: $since }) {
    current { todayProductionKwh yesterdayProductionKwh }
    history { wh timestamp uvLevel }
  }
  energy {
    history(input: { since: $since }) { id used solarExported time }
  }
}
"#;

const EINK_QUERY: &str = r#"
query EinkQuery($location: String!, $since: DateTime!) {
  weather(input: { location: $location }) {
    forecast { days { dateTime code description emoji min max uv } }
  }
  woolworths {
    products { name price }
  }
  solar {
    current {
      todayProductionKwh
      currentProductionWh
      uvLevel
      statistics { averages { last15Mins last1Hour } }
    }
    history(input: { since: $since }) { wh timestamp uvLevel }
  }
}
"#;

#[derive(Debug, Deserialize)]
struct GraphqlResponse<T> {
    data: Option<T>,
    #[serde(default)]
    errors: Vec<GraphqlError>,
}

#[derive(Debug, Deserialize)]
struct GraphqlError {
    message: String,
}

/// Timestamps arrive as RFC3339 strings or epoch milliseconds.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RawTime {
    Text(String),
    Millis(i64),
}

impl RawTime {
    fn into_string(self) -> String {
        match self {
            RawTime::Text(text) => text,
            RawTime::Millis(millis) => millis.to_string(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct RawEvent<S> {
    id: String,
    name: String,
    time: RawTime,
    state: S,
}

impl<S> RawEvent<S> {
    fn into_event(self, wrap: fn(S) -> EventState) -> DeviceEvent {
        DeviceEvent::new(self.id, self.name, wrap(self.state), self.time.into_string())
    }
}

#[derive(Debug, Deserialize)]
struct EventsData {
    #[serde(default)]
    doors: Vec<RawEvent<DoorState>>,
    #[serde(default)]
    appliances: Vec<RawEvent<ApplianceState>>,
    #[serde(default)]
    wifi: Vec<RawEvent<WifiState>>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct EnvironmentData {
    outdoor: Option<EnvironmentReading>,
    living_room: Option<EnvironmentReading>,
    bedroom: Option<EnvironmentReading>,
    laundry: Option<EnvironmentReading>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawSolarPoint {
    wh: f64,
    timestamp: RawTime,
    uv_level: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct SolarData {
    current: Option<SolarCurrent>,
    #[serde(default)]
    history: Vec<RawSolarPoint>,
}

#[derive(Debug, Deserialize)]
struct EnergyData {
    #[serde(default)]
    history: Vec<EnergyConsumption>,
}

#[derive(Debug, Deserialize)]
struct DashboardData {
    events: EventsData,
    environment: Option<EnvironmentData>,
    solar: Option<SolarData>,
    energy: Option<EnergyData>,
}

#[derive(Debug, Deserialize)]
struct ForecastData {
    #[serde(default)]
    days: Vec<ForecastDay>,
}

#[derive(Debug, Deserialize)]
struct WeatherData {
    forecast: Option<ForecastData>,
}

#[derive(Debug, Deserialize)]
struct WoolworthsData {
    #[serde(default)]
    products: Vec<GroceryProduct>,
}

#[derive(Debug, Deserialize)]
struct EinkData {
    weather: Option<WeatherData>,
    woolworths: Option<WoolworthsData>,
    solar: Option<SolarData>,
}

#[derive(Debug, Clone)]
pub struct GraphqlRepository {
    client: reqwest::Client,
    endpoint: String,
    token: Option<String>,
}

impl GraphqlRepository {
    pub fn new(endpoint: String, token: Option<String>, timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .context("Failed to build GraphQL HTTP client")?;

        Ok(Self {
            client,
            endpoint: endpoint.trim_end_matches('/').to_string(),
            token,
        })
    }

    async fn execute_query<T: DeserializeOwned>(&self, query: &str, variables: Value) -> Result<T> {
        let mut request = self
            .client
            .post(&self.endpoint)
            .header("Accept", "application/json")
            .json(&json!({ "query": query, "variables": variables }));
        if let Some(token) = &self.token {
            request = request.bearer_auth(token);
        }

        let response = request
            .send()
            .await
            .context("Failed to send request to GraphQL endpoint")?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            anyhow::bail!("GraphQL request failed with status {}: {}", status, body);
        }

        let payload = response
            .json::<GraphqlResponse<T>>()
            .await
            .context("Failed to parse GraphQL response")?;

        if let Some(error) = payload.errors.first() {
            anyhow::bail!("GraphQL query error: {}", error.message);
        }

        payload
            .data
            .context("GraphQL response contained no data")
    }
}

fn format_since(since: DateTime<Utc>) -> String {
    since.to_rfc3339_opts(SecondsFormat::Millis, true)
}

fn samples_from(history: Vec<RawSolarPoint>) -> Result<Vec<TelemetrySample>> {
    history
        .into_iter()
        .map(|p| -> Result<TelemetrySample> {
            let raw = p.timestamp.into_string();
            let timestamp_ms = parse_timestamp_ms("solar.history", &raw)?;
            Ok(TelemetrySample::new(timestamp_ms, p.wh, p.uv_level))
        })
        .collect()
}

fn environment_from(data: Option<EnvironmentData>) -> Vec<(String, Option<EnvironmentReading>)> {
    let Some(env) = data else {
        return Vec::new();
    };
    vec![
        ("outdoor".to_string(), env.outdoor),
        ("livingRoom".to_string(), env.living_room),
        ("bedroom".to_string(), env.bedroom),
        ("laundry".to_string(), env.laundry),
    ]
}

#[async_trait]
impl TelemetryRepository for GraphqlRepository {
    async fn fetch_dashboard(&self, since: DateTime<Utc>) -> Result<DashboardSnapshot> {
        let since = format_since(since);
        tracing::debug!("Executing dashboard query since {}", since);

        let data: DashboardData = self
            .execute_query(DASHBOARD_QUERY, json!({ "since": since }))
            .await?;

        let solar = data.solar.unwrap_or(SolarData {
            current: None,
            history: Vec::new(),
        });

        let snapshot = DashboardSnapshot {
            doors: data
                .events
                .doors
                .into_iter()
                .map(|e| e.into_event(EventState::Door))
                .collect(),
            appliances: data
                .events
                .appliances
                .into_iter()
                .map(|e| e.into_event(EventState::Appliance))
                .collect(),
            wifi: data
                .events
                .wifi
                .into_iter()
                .map(|e| e.into_event(EventState::Wifi))
                .collect(),
            solar_history: samples_from(solar.history)?,
            solar_current: solar.current.unwrap_or_default(),
            environment: environment_from(data.environment),
            energy_history: data.energy.map(|e| e.history).unwrap_or_default(),
        };

        tracing::debug!(
            "Fetched {} door, {} appliance, {} wifi events and {} solar samples",
            snapshot.doors.len(),
            snapshot.appliances.len(),
            snapshot.wifi.len(),
            snapshot.solar_history.len()
        );
        Ok(snapshot)
    }

    async fn fetch_eink(&self, since: DateTime<Utc>, location: &str) -> Result<EinkSnapshot> {
        let since = format_since(since);
        tracing::debug!("Executing e-ink query for {} since {}", location, since);

        let data: EinkData = self
            .execute_query(EINK_QUERY, json!({ "since": since, "location": location }))
            .await?;

        let solar = data.solar.unwrap_or(SolarData {
            current: None,
            history: Vec::new(),
        });

        Ok(EinkSnapshot {
            solar_history: samples_from(solar.history)?,
            solar_current: solar.current.unwrap_or_default(),
            forecast: data
                .weather
                .and_then(|w| w.forecast)
                .map(|f| f.days)
                .unwrap_or_default(),
            products: data.woolworths.map(|w| w.products).unwrap_or_default(),
        })
    }
}
