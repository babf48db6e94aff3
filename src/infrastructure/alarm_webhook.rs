// Webhook client for alarm notifications
use crate::application::alarm_service::{AlarmPayload, AlarmWebhook};
use anyhow::{Context, Result};
use async_trait::async_trait;
use std::time::Duration;

const SECRET_HEADER: &str = "X-Webhook-Secret";

#[derive(Debug, Clone)]
pub struct HttpAlarmWebhook {
    client: reqwest::Client,
    url: String,
    secret: String,
}

impl HttpAlarmWebhook {
    /// `timeout` bounds the whole call, connect through body.
    pub fn new(url: String, secret: String, timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .context("Failed to build webhook HTTP client")?;
        Ok(Self {
            client,
            url,
            secret,
        })
    }
}

#[async_trait]
impl AlarmWebhook for HttpAlarmWebhook {
    async fn send(&self, payload: &AlarmPayload) -> Result<u16> {
        let response = self
            .client
            .post(&self.url)
            .header(SECRET_HEADER, &self.secret)
            .json(payload)
            .send()
            .await
            .context("Failed to send alarm webhook")?;

        Ok(response.status().as_u16())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::{Matcher, Server};
    use serde_json::json;

    #[tokio::test]
    async fn test_posts_payload_with_secret() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("POST", "/v1/ingest/home/alarm")
            .match_header("x-webhook-secret", "hunter2")
            .match_header("content-type", "application/json")
            .match_body(Matcher::Json(json!({ "local_time": "2025-06-02T06:30:00+08:00" })))
            .with_status(204)
            .create_async()
            .await;

        let webhook = HttpAlarmWebhook::new(
            format!("{}/v1/ingest/home/alarm", server.url()),
            "hunter2".into(),
            Duration::from_secs(30),
        )
        .unwrap();
        let status = webhook
            .send(&AlarmPayload {
                local_time: "2025-06-02T06:30:00+08:00".into(),
            })
            .await
            .unwrap();

        assert_eq!(status, 204);
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_error_status_is_returned() {
        let mut server = Server::new_async().await;
        let _mock = server
            .mock("POST", "/")
            .with_status(401)
            .create_async()
            .await;

        let webhook = HttpAlarmWebhook::new(server.url(), "wrong".into(), Duration::from_secs(30)).unwrap();
        let status = webhook
            .send(&AlarmPayload {
                local_time: "2025-06-02T06:30:00+08:00".into(),
            })
            .await
            .unwrap();
        assert_eq!(status, 401);
    }
}
