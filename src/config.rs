use crate::models::Selection;
use serde::{Deserialize, Deserializer};
use std::time::Duration;

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub source: SourceConfig,
    pub sink: SinkConfig,
    #[serde(default)]
    pub selection: Selection,
    pub polling: PollingConfig,
}

/// Applications Manager server.
#[derive(Debug, Clone, Deserialize)]
pub struct SourceConfig {
    /// Base URL, e.g. `http://apm:9090`.
    pub server: String,
    pub api_key: String,
    /// `type` parameter of ListMonitor.
    #[serde(default = "default_monitor_type")]
    pub monitor_type: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    #[serde(default)]
    pub accept_invalid_certs: bool,
}

/// Splunk HTTP Event Collector.
#[derive(Debug, Clone, Deserialize)]
pub struct SinkConfig {
    /// Full collector URL, e.g. `https://splunk:8088/services/collector`.
    pub url: String,
    pub token: String,
    pub index: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    #[serde(default)]
    pub accept_invalid_certs: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PollingConfig {
    /// Seconds between cycles. Accepts `30`, `"30s"`, `"5m"` or `"1h"`.
    #[serde(rename = "interval", deserialize_with = "deserialize_interval")]
    pub interval_secs: u64,
    /// Run a single cycle and exit.
    #[serde(default)]
    pub run_once: bool,
}

impl PollingConfig {
    pub fn interval(&self) -> Duration {
        Duration::from_secs(self.interval_secs)
    }
}

fn default_monitor_type() -> String {
    "all".into()
}

fn default_timeout_secs() -> u64 {
    10
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawInterval {
    Secs(u64),
    Text(String),
}

fn deserialize_interval<'de, D: Deserializer<'de>>(d: D) -> Result<u64, D::Error> {
    match RawInterval::deserialize(d)? {
        RawInterval::Secs(secs) => Ok(secs),
        RawInterval::Text(text) => parse_interval(&text).map_err(serde::de::Error::custom),
    }
}

/// Parses `30s`, `5m`, `1h` or bare seconds into seconds.
pub fn parse_interval(s: &str) -> anyhow::Result<u64> {
    let s = s.trim().to_lowercase();
    let (digits, multiplier) = match s.char_indices().last() {
        Some((i, 's')) => (&s[..i], 1),
        Some((i, 'm')) => (&s[..i], 60),
        Some((i, 'h')) => (&s[..i], 3600),
        _ => (s.as_str(), 1),
    };
    let value: u64 = digits
        .trim()
        .parse()
        .map_err(|_| anyhow::anyhow!("invalid interval {:?}; expected e.g. 30s, 5m, 1h", s))?;
    value
        .checked_mul(multiplier)
        .ok_or_else(|| anyhow::anyhow!("interval {:?} is too large", s))
}

impl AppConfig {
    pub fn load() -> anyhow::Result<Self> {
        let path = std::env::var("CONFIG_FILE").unwrap_or_else(|_| "config.toml".into());
        let s = std::fs::read_to_string(&path)?;
        Self::load_from_str(&s)
    }

    /// Parse and validate config from a string (e.g. for tests).
    pub fn load_from_str(s: &str) -> anyhow::Result<Self> {
        let config: AppConfig = toml::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> anyhow::Result<()> {
        anyhow::ensure!(
            !self.source.server.trim().is_empty(),
            "source.server must be non-empty"
        );
        anyhow::ensure!(
            !self.source.api_key.is_empty(),
            "source.api_key must be non-empty"
        );
        anyhow::ensure!(
            self.source.timeout_secs > 0,
            "source.timeout_secs must be > 0, got {}",
            self.source.timeout_secs
        );
        anyhow::ensure!(!self.sink.url.trim().is_empty(), "sink.url must be non-empty");
        anyhow::ensure!(!self.sink.token.is_empty(), "sink.token must be non-empty");
        anyhow::ensure!(!self.sink.index.is_empty(), "sink.index must be non-empty");
        anyhow::ensure!(
            self.sink.timeout_secs > 0,
            "sink.timeout_secs must be > 0, got {}",
            self.sink.timeout_secs
        );
        anyhow::ensure!(
            self.selection.groups.iter().all(|g| !g.trim().is_empty()),
            "selection.groups must not contain empty names"
        );
        anyhow::ensure!(
            self.polling.interval_secs > 0,
            "polling.interval must be > 0, got {}",
            self.polling.interval_secs
        );
        Ok(())
    }
}
