// Flat event records and the HEC envelope

use serde::Serialize;
use std::collections::BTreeMap;

pub const HOST_FIELD: &str = "host";
pub const SOURCE_FIELD: &str = "source";
pub const ATTRIBUTES_FIELD: &str = "Attributes";

/// Flattened attribute map: `FlatKey` to value. Absent values serialize as `null`.
pub type FlatAttributes = BTreeMap<String, Option<String>>;

/// One event sent to the sink: an entity's scalar fields plus the synthesized
/// `host`, `source` and `Attributes` fields.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EventRecord {
    #[serde(flatten)]
    fields: BTreeMap<String, String>,
    #[serde(rename = "Attributes")]
    attributes: FlatAttributes,
    host: String,
    source: String,
}

impl EventRecord {
    /// Synthesized fields win over scalar fields with the same name.
    pub fn new<I, K, V>(fields: I, attributes: FlatAttributes, host: &str, source: &str) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let mut fields: BTreeMap<String, String> = fields
            .into_iter()
            .map(|(k, v)| (k.into(), v.into()))
            .collect();
        for reserved in [HOST_FIELD, SOURCE_FIELD, ATTRIBUTES_FIELD] {
            fields.remove(reserved);
        }
        Self {
            fields,
            attributes,
            host: host.to_string(),
            source: source.to_string(),
        }
    }

    pub fn host(&self) -> &str {
        &self.host
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn attributes(&self) -> &FlatAttributes {
        &self.attributes
    }

    pub fn field(&self, name: &str) -> Option<&str> {
        self.fields.get(name).map(String::as_str)
    }

    pub fn fields(&self) -> &BTreeMap<String, String> {
        &self.fields
    }
}

/// HEC request body: `{"index": ..., "event": {...}}`.
#[derive(Debug, Serialize)]
pub struct HecEnvelope<'a> {
    pub index: &'a str,
    pub event: &'a EventRecord,
}
