// Raw GetMonitorData shape, decoupled from the XML tree

/// One `Attribute` / `CHILDATTRIBUTES` node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawAttribute {
    /// `DISPLAYNAME`, or `AttributeID` when the display name is missing.
    pub name: String,
    pub unit: Option<String>,
    pub value: Option<String>,
}

impl RawAttribute {
    pub fn new(name: impl Into<String>, unit: Option<&str>, value: Option<&str>) -> Self {
        Self {
            name: name.into(),
            unit: unit.map(str::to_string),
            value: value.map(str::to_string),
        }
    }
}

/// `Monitorinfo` or `CHILDMONITORINFO`: scalar XML attributes plus attribute nodes.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawEntity {
    /// XML attributes in document order.
    pub fields: Vec<(String, String)>,
    pub attributes: Vec<RawAttribute>,
}

impl RawEntity {
    /// Exact-name field lookup.
    pub fn field(&self, name: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }
}

/// Parsed GetMonitorData response.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MonitorPayload {
    /// `None` when the response has no `Monitorinfo` node.
    pub main: Option<RawEntity>,
    /// One entry per `CHILDMONITORS` container, children in document order.
    pub child_groups: Vec<Vec<RawEntity>>,
}

impl MonitorPayload {
    pub fn child_count(&self) -> usize {
        self.child_groups.iter().map(Vec::len).sum()
    }
}
