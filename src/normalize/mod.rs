// Monitor payload -> flat event records.
// Main entity first, then every child across every CHILDMONITORS container in document order.
// Children inherit the main entity's host.

mod flatten;

pub use flatten::{flat_key, flatten};

use crate::apm_repo::xml;
use crate::error::PipelineError;
use crate::models::{EventRecord, MonitorPayload, RawEntity};

pub const DEFAULT_HOST: &str = "unknown";
pub const MAIN_SOURCE: &str = "main";
pub const DEFAULT_CHILD_SOURCE: &str = "child";

/// Returns `1 + payload.child_count()` records, or none when the main entity is absent.
pub fn normalize(payload: &MonitorPayload) -> Vec<EventRecord> {
    let Some(main) = payload.main.as_ref() else {
        return Vec::new();
    };

    let host = main.field("RESOURCENAME").unwrap_or(DEFAULT_HOST);
    let mut records = Vec::with_capacity(1 + payload.child_count());
    records.push(entity_record(main, host, MAIN_SOURCE));

    for child in payload.child_groups.iter().flatten() {
        let source = child.field("DISPLAYNAME").unwrap_or(DEFAULT_CHILD_SOURCE);
        records.push(entity_record(child, host, source));
    }
    records
}

/// Parses a GetMonitorData document and normalizes it. A well-formed document without
/// `Monitorinfo` yields no records; a document that is not XML is an error.
pub fn normalize_document(xml_text: &str) -> Result<Vec<EventRecord>, PipelineError> {
    let payload = xml::parse_monitor_data(xml_text)?;
    Ok(normalize(&payload))
}

fn entity_record(entity: &RawEntity, host: &str, source: &str) -> EventRecord {
    EventRecord::new(
        entity.fields.iter().map(|(k, v)| (k.as_str(), v.as_str())),
        flatten(&entity.attributes),
        host,
        source,
    )
}
