// Monitor selection: attribute filters and group names

use super::MonitorRef;
use serde::Deserialize;
use std::collections::BTreeMap;

/// Expected value for one filter key. A TOML string is a single value, an array a set.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum FilterValue {
    /// Trimmed, case-insensitive equality.
    One(String),
    /// Exact membership.
    AnyOf(Vec<String>),
}

impl FilterValue {
    pub fn matches(&self, actual: &str) -> bool {
        match self {
            FilterValue::One(expected) => {
                actual.trim().to_lowercase() == expected.trim().to_lowercase()
            }
            FilterValue::AnyOf(accepted) => accepted.iter().any(|v| v == actual),
        }
    }
}

impl From<&str> for FilterValue {
    fn from(value: &str) -> Self {
        FilterValue::One(value.to_string())
    }
}

impl<const N: usize> From<[&str; N]> for FilterValue {
    fn from(values: [&str; N]) -> Self {
        FilterValue::AnyOf(values.iter().map(|v| v.to_string()).collect())
    }
}

/// Attribute name to expected value. A monitor matches only when every key is present on
/// it and matches; an empty spec matches everything.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(transparent)]
pub struct FilterSpec {
    entries: BTreeMap<String, FilterValue>,
}

impl FilterSpec {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, key: impl Into<String>, value: impl Into<FilterValue>) -> Self {
        self.entries.insert(key.into(), value.into());
        self
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn matches(&self, monitor: &MonitorRef) -> bool {
        self.entries.iter().all(|(key, expected)| {
            monitor
                .attribute(key)
                .is_some_and(|actual| expected.matches(actual))
        })
    }
}

/// Which monitors a cycle processes. Non-empty `groups` switches discovery to group
/// membership; `filters` applies in both modes.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct Selection {
    #[serde(default)]
    pub filters: FilterSpec,
    #[serde(default)]
    pub groups: Vec<String>,
}

impl Selection {
    pub fn uses_groups(&self) -> bool {
        !self.groups.is_empty()
    }
}
