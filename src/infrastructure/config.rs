use crate::application::daily::EnergyTariff;
use crate::domain::error::TimelineError;
use chrono_tz::Tz;
use serde::Deserialize;

#[derive(Debug, Deserialize, Clone)]
pub struct GatewayConfig {
    #[serde(default)]
    pub server: ServerSettings,
    pub graphql: GraphqlSettings,
    #[serde(default)]
    pub display: DisplaySettings,
    pub alarm: AlarmSettings,
    #[serde(default)]
    pub tariff: EnergyTariff,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerSettings {
    pub bind: String,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            bind: "0.0.0.0:8080".to_string(),
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct GraphqlSettings {
    pub endpoint: String,
    #[serde(default)]
    pub token: Option<String>,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

#[derive(Debug, Deserialize, Clone)]
pub struct DisplaySettings {
    pub timezone: String,
    /// Location code for the e-ink query
    pub location: String,
}

impl Default for DisplaySettings {
    fn default() -> Self {
        Self {
            timezone: "Australia/Perth".to_string(),
            location: "perth".to_string(),
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct AlarmSettings {
    pub webhook_url: String,
    pub secret: String,
    #[serde(default = "default_alarm_timezone")]
    pub timezone: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_alarm_timezone() -> String {
    "Australia/Perth".to_string()
}

fn default_timeout_secs() -> u64 {
    30
}

pub fn load_gateway_config() -> anyhow::Result<GatewayConfig> {
    let settings = config::Config::builder()
        .add_source(config::File::with_name("config/gateway"))
        .add_source(
            config::Environment::with_prefix("GATEWAY")
                .prefix_separator("__")
                .separator("__"),
        )
        .build()?;

    Ok(settings.try_deserialize()?)
}

/// Resolve an IANA zone name such as `Australia/Perth`.
pub fn parse_timezone(name: &str) -> Result<Tz, TimelineError> {
    name.parse::<Tz>()
        .map_err(|_| TimelineError::InvalidTimeZone(name.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_timezone() {
        assert_eq!(parse_timezone("Australia/Perth").unwrap(), chrono_tz::Australia::Perth);
        assert_eq!(
            parse_timezone("Mars/Olympus"),
            Err(TimelineError::InvalidTimeZone("Mars/Olympus".to_string()))
        );
    }

    #[test]
    fn test_defaults_fill_optional_sections() {
        let settings = config::Config::builder()
            .add_source(config::File::from_str(
                r#"
                [graphql]
                endpoint = "http://localhost:8000/graphql"

                [alarm]
                webhook_url = "http://localhost:8000/v1/ingest/home/alarm"
                secret = "s3cret"

                [tariff]
                cost_per_kwh = 0.3
                "#,
                config::FileFormat::Toml,
            ))
            .build()
            .unwrap();
        let config: GatewayConfig = settings.try_deserialize().unwrap();

        assert_eq!(config.server.bind, "0.0.0.0:8080");
        assert_eq!(config.graphql.timeout_secs, 30);
        assert_eq!(config.display.timezone, "Australia/Perth");
        assert_eq!(config.alarm.timeout_secs, 30);
        assert_eq!(config.tariff.cost_per_kwh, 0.3);
        assert_eq!(config.tariff.peak_start_hour, 15);
    }
}
