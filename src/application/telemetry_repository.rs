// Repository trait for home telemetry data access
use crate::domain::dashboard::{DashboardSnapshot, EinkSnapshot};
use async_trait::async_trait;
use chrono::{DateTime, Utc};

#[async_trait]
pub trait TelemetryRepository: Send + Sync {
    /// Events, solar, environment and energy history since the cutoff
    async fn fetch_dashboard(&self, since: DateTime<Utc>) -> anyhow::Result<DashboardSnapshot>;

    /// Solar, forecast and grocery prices for the e-ink display at `location`
    async fn fetch_eink(&self, since: DateTime<Utc>, location: &str) -> anyhow::Result<EinkSnapshot>;
}
