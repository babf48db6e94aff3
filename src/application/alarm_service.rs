// Alarm service - Forwards the next alarm time to the home webhook
use async_trait::async_trait;
use chrono::DateTime;
use chrono_tz::Tz;
use serde::Serialize;
use std::sync::Arc;

/// Where alarm times are delivered.
#[async_trait]
pub trait AlarmWebhook: Send + Sync {
    /// POST the payload and return the HTTP status code.
    async fn send(&self, payload: &AlarmPayload) -> anyhow::Result<u16>;
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AlarmPayload {
    pub local_time: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AlarmDelivery {
    pub local_time: String,
    pub status: u16,
    pub delivered: bool,
}

#[derive(Clone)]
pub struct AlarmService {
    webhook: Arc<dyn AlarmWebhook>,
    timezone: Tz,
}

impl AlarmService {
    pub fn new(webhook: Arc<dyn AlarmWebhook>, timezone: Tz) -> Self {
        Self { webhook, timezone }
    }

    /// `yyyy-MM-ddTHH:mm:ss±HH:MM` in the alarm time zone.
    pub fn format_local_time(&self, trigger_time_ms: i64) -> anyhow::Result<String> {
        let utc = DateTime::from_timestamp_millis(trigger_time_ms)
            .ok_or_else(|| anyhow::anyhow!("Alarm time {} is out of range", trigger_time_ms))?;
        Ok(utc
            .with_timezone(&self.timezone)
            .format("%Y-%m-%dT%H:%M:%S%:z")
            .to_string())
    }

    /// Send once. A non-2xx response is logged and reported, never retried.
    pub async fn forward(&self, trigger_time_ms: i64) -> anyhow::Result<AlarmDelivery> {
        let local_time = self.format_local_time(trigger_time_ms)?;
        let payload = AlarmPayload {
            local_time: local_time.clone(),
        };

        let status = self.webhook.send(&payload).await?;
        let delivered = (200..300).contains(&status);
        if delivered {
            tracing::info!("Sent alarm details for {}", local_time);
        } else {
            tracing::error!("Failed to send alarm details: status {}", status);
        }

        Ok(AlarmDelivery {
            local_time,
            status,
            delivered,
        })
    }
}
