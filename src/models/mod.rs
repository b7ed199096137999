// Domain models: monitor refs, raw payloads, event records, selection

mod event;
mod filter;
mod monitor;
mod payload;

pub use event::{
    ATTRIBUTES_FIELD, EventRecord, FlatAttributes, HOST_FIELD, HecEnvelope, SOURCE_FIELD,
};
pub use filter::{FilterSpec, FilterValue, Selection};
pub use monitor::{AttributeMap, MonitorGroup, MonitorRef};
pub use payload::{MonitorPayload, RawAttribute, RawEntity};
