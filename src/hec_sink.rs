// Splunk HTTP Event Collector sink: one POST per event.

use crate::config::SinkConfig;
use crate::error::HttpError;
use crate::models::{EventRecord, HecEnvelope};
use crate::version;
use async_trait::async_trait;
use reqwest::header::AUTHORIZATION;
use std::time::Duration;

#[async_trait]
pub trait EventSink: Send + Sync {
    /// Delivers one event. Any non-2xx answer is an error.
    async fn send(&self, event: &EventRecord) -> Result<(), HttpError>;
}

pub struct HecSink {
    client: reqwest::Client,
    url: String,
    auth_header: String,
    index: String,
}

impl HecSink {
    pub fn connect(config: &SinkConfig) -> anyhow::Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(version::user_agent())
            .timeout(Duration::from_secs(config.timeout_secs))
            .danger_accept_invalid_certs(config.accept_invalid_certs)
            .build()?;
        Ok(Self {
            client,
            url: config.url.clone(),
            auth_header: format!("Splunk {}", config.token),
            index: config.index.clone(),
        })
    }
}

#[async_trait]
impl EventSink for HecSink {
    async fn send(&self, event: &EventRecord) -> Result<(), HttpError> {
        let envelope = HecEnvelope {
            index: &self.index,
            event,
        };
        let response = self
            .client
            .post(&self.url)
            .header(AUTHORIZATION, &self.auth_header)
            .json(&envelope)
            .send()
            .await?;

        let status = response.status();
        if status.is_success() {
            tracing::debug!(host = event.host(), source = event.source(), "event sent");
            return Ok(());
        }
        let body = response.text().await.unwrap_or_default();
        Err(HttpError::Status {
            status: status.as_u16(),
            body,
        })
    }
}
