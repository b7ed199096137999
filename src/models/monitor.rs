// Monitor references produced by discovery

use std::collections::HashMap;

/// Discovery-time attributes of a monitor.
///
/// APM spells the same attribute differently across endpoints (`RESOURCEID`,
/// `resourceid`, `ResourceID`), so lookups ignore ASCII case. Keys are normalized once on
/// insert; the original spelling and document order are kept for iteration.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AttributeMap {
    entries: Vec<(String, String)>,
    index: HashMap<String, usize>,
}

impl AttributeMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts or replaces a value. A key that differs only in case replaces the earlier
    /// entry in place.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        let key = key.into();
        let value = value.into();
        let normalized = key.to_ascii_uppercase();
        match self.index.get(&normalized).copied() {
            Some(pos) => self.entries[pos] = (key, value),
            None => {
                self.index.insert(normalized, self.entries.len());
                self.entries.push((key, value));
            }
        }
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.index
            .get(&key.to_ascii_uppercase())
            .map(|&pos| self.entries[pos].1.as_str())
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.index.contains_key(&key.to_ascii_uppercase())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for AttributeMap {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut map = AttributeMap::new();
        for (k, v) in iter {
            map.insert(k, v);
        }
        map
    }
}

/// A monitor as listed by `ListMonitor` or `ListMGDetails`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MonitorRef {
    pub resource_id: String,
    pub display_name: String,
    pub host_ip: Option<String>,
    /// Every attribute of the source node, identifier fields included.
    pub attributes: AttributeMap,
}

impl MonitorRef {
    /// Builds a ref from a node's attributes. Returns `None` when there is no resource id,
    /// since such a monitor cannot be fetched.
    pub fn from_attributes(attributes: AttributeMap) -> Option<Self> {
        let resource_id = attributes
            .get("RESOURCEID")
            .map(str::trim)
            .filter(|id| !id.is_empty())?
            .to_string();
        let display_name = attributes.get("DISPLAYNAME").unwrap_or_default().to_string();
        let host_ip = attributes.get("HOSTIP").map(str::to_string);
        Some(Self {
            resource_id,
            display_name,
            host_ip,
            attributes,
        })
    }

    /// Case-insensitive attribute lookup.
    pub fn attribute(&self, key: &str) -> Option<&str> {
        self.attributes.get(key)
    }
}

/// A monitor group from `ListMonitorGroups`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MonitorGroup {
    pub display_name: String,
    pub group_id: String,
}
