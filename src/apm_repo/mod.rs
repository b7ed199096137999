// Applications Manager XML API client

pub mod xml;

use crate::config::SourceConfig;
use crate::error::HttpError;
use crate::version;
use async_trait::async_trait;
use std::time::Duration;
use tracing::instrument;

const LIST_MONITOR_PATH: &str = "/AppManager/xml/ListMonitor";
const LIST_GROUPS_PATH: &str = "/AppManager/xml/ListMonitorGroups";
const GROUP_DETAILS_PATH: &str = "/AppManager/xml/ListMGDetails";
const MONITOR_DATA_PATH: &str = "/AppManager/xml/GetMonitorData";

/// Raw XML documents from the monitor server. Parsing is left to the caller.
#[async_trait]
pub trait MonitorSource: Send + Sync {
    /// `ListMonitor` document.
    async fn fetch_monitor_list(&self) -> Result<String, HttpError>;

    /// `ListMonitorGroups` document.
    async fn fetch_group_list(&self) -> Result<String, HttpError>;

    /// `ListMGDetails` document for one group.
    async fn fetch_group_details(&self, group_id: &str) -> Result<String, HttpError>;

    /// `GetMonitorData` document for one monitor.
    async fn fetch_monitor_data(&self, resource_id: &str) -> Result<String, HttpError>;
}

pub struct ApmRepo {
    client: reqwest::Client,
    server: String,
    api_key: String,
    monitor_type: String,
}

impl ApmRepo {
    pub fn connect(config: &SourceConfig) -> anyhow::Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(version::user_agent())
            .timeout(Duration::from_secs(config.timeout_secs))
            .danger_accept_invalid_certs(config.accept_invalid_certs)
            .build()?;
        Ok(Self {
            client,
            server: config.server.trim_end_matches('/').to_string(),
            api_key: config.api_key.clone(),
            monitor_type: config.monitor_type.clone(),
        })
    }

    /// GET `path` with `apikey` as the first query parameter.
    async fn call(&self, path: &str, params: &[(&str, &str)]) -> Result<String, HttpError> {
        let mut query: Vec<(&str, &str)> = Vec::with_capacity(params.len() + 1);
        query.push(("apikey", self.api_key.as_str()));
        query.extend_from_slice(params);

        let response = self
            .client
            .get(format!("{}{}", self.server, path))
            .query(&query)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(HttpError::Status {
                status: status.as_u16(),
                body,
            });
        }
        Ok(response.text().await?)
    }
}

#[async_trait]
impl MonitorSource for ApmRepo {
    #[instrument(skip(self), fields(repo = "apm", operation = "list_monitor"))]
    async fn fetch_monitor_list(&self) -> Result<String, HttpError> {
        self.call(LIST_MONITOR_PATH, &[("type", self.monitor_type.as_str())])
            .await
    }

    #[instrument(skip(self), fields(repo = "apm", operation = "list_monitor_groups"))]
    async fn fetch_group_list(&self) -> Result<String, HttpError> {
        self.call(LIST_GROUPS_PATH, &[]).await
    }

    #[instrument(skip(self), fields(repo = "apm", operation = "list_mg_details"))]
    async fn fetch_group_details(&self, group_id: &str) -> Result<String, HttpError> {
        self.call(GROUP_DETAILS_PATH, &[("groupId", group_id)]).await
    }

    #[instrument(skip(self), fields(repo = "apm", operation = "get_monitor_data"))]
    async fn fetch_monitor_data(&self, resource_id: &str) -> Result<String, HttpError> {
        self.call(MONITOR_DATA_PATH, &[("resourceid", resource_id)])
            .await
    }
}
