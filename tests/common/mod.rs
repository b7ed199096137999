// Shared test helpers: APM XML fixtures, a scripted MonitorSource and a recording sink

#![allow(dead_code)]

use apm_relay::apm_repo::MonitorSource;
use apm_relay::error::HttpError;
use apm_relay::hec_sink::EventSink;
use apm_relay::models::EventRecord;
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Mutex;

pub const MONITOR_DATA_SRV01: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<AppManager-response uri="/AppManager/xml/GetMonitorData">
  <result>
    <response method="GetMonitorData">
      <Monitorinfo RESOURCEID="10000031" RESOURCENAME="srv-01" DISPLAYNAME="srv-01" TYPE="Linux" HEALTHSTATUS="clear">
        <Attribute AttributeID="708" DISPLAYNAME="Response Time" Units="ms" Value="12"/>
        <Attribute AttributeID="709" DISPLAYNAME="Availability" Units="  " Value="up"/>
        <Attribute AttributeID="710" DISPLAYNAME="" Units="%" Value="41"/>
        <Attribute AttributeID="711" DISPLAYNAME="Last Polled"/>
        <CHILDMONITORS>
          <CHILDMONITORINFO DISPLAYNAME="CPU" RESOURCENAME="srv-01_cpu" RESOURCEID="10000032">
            <CHILDATTRIBUTES AttributeID="801" DISPLAYNAME="CPU Utilization" Units="%" Value="37"/>
          </CHILDMONITORINFO>
        </CHILDMONITORS>
      </Monitorinfo>
    </response>
  </result>
</AppManager-response>"#;

pub const MONITOR_DATA_NO_INFO: &str = r#"<AppManager-response uri="/AppManager/xml/GetMonitorData">
  <result>
    <response method="GetMonitorData"/>
  </result>
</AppManager-response>"#;

/// Minimal GetMonitorData document with one main entity and no children.
pub fn monitor_data(resource_name: &str) -> String {
    format!(
        r#"<AppManager-response><result><response><Monitorinfo RESOURCENAME="{resource_name}"><Attribute DISPLAYNAME="Health" Value="clear"/></Monitorinfo></response></result></AppManager-response>"#
    )
}

/// ListMonitor document from `(RESOURCEID, extra attributes)` pairs.
pub fn monitor_list(monitors: &[(&str, &[(&str, &str)])]) -> String {
    let mut body = String::new();
    for (id, attrs) in monitors {
        body.push_str(&format!(r#"<Monitor RESOURCEID="{id}" DISPLAYNAME="mon-{id}""#));
        for (k, v) in *attrs {
            body.push_str(&format!(r#" {k}="{v}""#));
        }
        body.push_str("/>");
    }
    format!(
        r#"<AppManager-response uri="/AppManager/xml/ListMonitor"><result><response method="ListMonitor">{body}</response></result></AppManager-response>"#
    )
}

pub const GROUP_LIST: &str = r#"<AppManager-response uri="/AppManager/xml/ListMonitorGroups">
  <result>
    <response method="ListMonitorGroups">
      <MonitorGroup DISPLAYNAME=" Linux Group " RESOURCEID="20001"/>
      <MonitorGroup DISPLAYNAME="Windows Group" RESOURCEID="20002">
        <MonitorGroup DISPLAYNAME="DB Servers" RESOURCEID="20003"/>
      </MonitorGroup>
    </response>
  </result>
</AppManager-response>"#;

/// ListMGDetails document from `(RESOURCEID, DISPLAYNAME)` pairs.
pub fn group_members(members: &[(&str, &str)]) -> String {
    let body: String = members
        .iter()
        .map(|(id, name)| format!(r#"<Monitors RESOURCEID="{id}" DISPLAYNAME="{name}"/>"#))
        .collect();
    format!(
        r#"<AppManager-response><result><response><MonitorGroup><MonitorDetails>{body}</MonitorDetails></MonitorGroup></response></result></AppManager-response>"#
    )
}

fn http_500() -> HttpError {
    HttpError::Status {
        status: 500,
        body: "boom".into(),
    }
}

/// Scripted MonitorSource. Unknown ids answer HTTP 500. Records every monitor data call.
#[derive(Default)]
pub struct FakeSource {
    pub monitor_list: Option<String>,
    pub group_list: Option<String>,
    pub group_details: HashMap<String, String>,
    pub monitor_data: HashMap<String, String>,
    pub data_calls: Mutex<Vec<String>>,
    pub detail_calls: Mutex<Vec<String>>,
}

impl FakeSource {
    pub fn with_monitor_list(mut self, xml: impl Into<String>) -> Self {
        self.monitor_list = Some(xml.into());
        self
    }

    pub fn with_group_list(mut self, xml: impl Into<String>) -> Self {
        self.group_list = Some(xml.into());
        self
    }

    pub fn with_group_details(mut self, group_id: &str, xml: impl Into<String>) -> Self {
        self.group_details.insert(group_id.into(), xml.into());
        self
    }

    pub fn with_monitor_data(mut self, resource_id: &str, xml: impl Into<String>) -> Self {
        self.monitor_data.insert(resource_id.into(), xml.into());
        self
    }

    pub fn data_calls(&self) -> Vec<String> {
        self.data_calls.lock().unwrap().clone()
    }

    pub fn detail_calls(&self) -> Vec<String> {
        self.detail_calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl MonitorSource for FakeSource {
    async fn fetch_monitor_list(&self) -> Result<String, HttpError> {
        self.monitor_list.clone().ok_or_else(http_500)
    }

    async fn fetch_group_list(&self) -> Result<String, HttpError> {
        self.group_list.clone().ok_or_else(http_500)
    }

    async fn fetch_group_details(&self, group_id: &str) -> Result<String, HttpError> {
        self.detail_calls.lock().unwrap().push(group_id.to_string());
        self.group_details.get(group_id).cloned().ok_or_else(http_500)
    }

    async fn fetch_monitor_data(&self, resource_id: &str) -> Result<String, HttpError> {
        self.data_calls.lock().unwrap().push(resource_id.to_string());
        self.monitor_data.get(resource_id).cloned().ok_or_else(http_500)
    }
}

/// Sink that keeps every event; events whose `host` is in `reject_hosts` fail with 503.
#[derive(Default)]
pub struct RecordingSink {
    pub events: Mutex<Vec<EventRecord>>,
    pub reject_hosts: Vec<String>,
}

impl RecordingSink {
    pub fn rejecting(hosts: &[&str]) -> Self {
        Self {
            events: Mutex::new(Vec::new()),
            reject_hosts: hosts.iter().map(|h| h.to_string()).collect(),
        }
    }

    pub fn events(&self) -> Vec<EventRecord> {
        self.events.lock().unwrap().clone()
    }

    pub fn hosts(&self) -> Vec<String> {
        self.events().iter().map(|e| e.host().to_string()).collect()
    }
}

#[async_trait]
impl EventSink for RecordingSink {
    async fn send(&self, event: &EventRecord) -> Result<(), HttpError> {
        if self.reject_hosts.iter().any(|h| h == event.host()) {
            return Err(HttpError::Status {
                status: 503,
                body: "Server is busy".into(),
            });
        }
        self.events.lock().unwrap().push(event.clone());
        Ok(())
    }
}
