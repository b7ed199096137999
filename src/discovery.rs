// Monitor discovery: flat ListMonitor or group membership, then the attribute filter.

use crate::apm_repo::{MonitorSource, xml};
use crate::error::PipelineError;
use crate::models::{FilterSpec, MonitorRef, Selection};
use std::collections::HashSet;
use tracing::{debug, info, warn};

/// Lists every monitor. A response without `result/response` is an empty list.
pub async fn list_monitors(source: &dyn MonitorSource) -> Result<Vec<MonitorRef>, PipelineError> {
    let xml_text = source
        .fetch_monitor_list()
        .await
        .map_err(|e| PipelineError::DiscoveryUnavailable(e.to_string()))?;
    let parsed = xml::parse_monitor_list(&xml_text)
        .map_err(|e| PipelineError::DiscoveryUnavailable(e.to_string()))?;

    let Some(monitors) = parsed else {
        warn!(operation = "list_monitors", "no <response> node in ListMonitor XML");
        return Ok(Vec::new());
    };
    for m in &monitors {
        debug!(
            resource_id = %m.resource_id,
            display_name = %m.display_name,
            host_ip = m.host_ip.as_deref().unwrap_or("-"),
            "monitor listed"
        );
    }
    Ok(monitors)
}

/// Resolves group display names to ids, then lists each group's members.
///
/// Names with no exactly-matching group are skipped. A group whose member list cannot be
/// fetched or parsed is skipped with a warning. Monitors that belong to several requested
/// groups are returned once, at their first position.
pub async fn list_group_monitors(
    source: &dyn MonitorSource,
    group_names: &[String],
) -> Result<Vec<MonitorRef>, PipelineError> {
    let xml_text = source
        .fetch_group_list()
        .await
        .map_err(|e| PipelineError::DiscoveryUnavailable(e.to_string()))?;
    let groups = xml::parse_group_list(&xml_text)
        .map_err(|e| PipelineError::DiscoveryUnavailable(e.to_string()))?;

    let mut seen = HashSet::new();
    let mut monitors = Vec::new();
    for group in groups
        .iter()
        .filter(|g| group_names.iter().any(|name| *name == g.display_name))
    {
        let members = match source.fetch_group_details(&group.group_id).await {
            Ok(text) => xml::parse_group_members(&text),
            Err(e) => {
                warn!(
                    group = %group.display_name,
                    group_id = %group.group_id,
                    error = %e,
                    "group details fetch failed"
                );
                continue;
            }
        };
        let members = match members {
            Ok(m) => m,
            Err(e) => {
                warn!(group = %group.display_name, error = %e, "group details unparsable");
                continue;
            }
        };
        info!(
            group = %group.display_name,
            members = members.len(),
            "group resolved"
        );
        for m in members {
            if seen.insert(m.resource_id.clone()) {
                monitors.push(m);
            }
        }
    }
    Ok(monitors)
}

/// Keeps monitors matching every entry of `spec`, preserving order.
pub fn apply_filter(monitors: Vec<MonitorRef>, spec: &FilterSpec) -> Vec<MonitorRef> {
    if spec.is_empty() {
        return monitors;
    }
    monitors.into_iter().filter(|m| spec.matches(m)).collect()
}

/// Discovery for one cycle, as selected by configuration.
pub async fn discover(
    source: &dyn MonitorSource,
    selection: &Selection,
) -> Result<Vec<MonitorRef>, PipelineError> {
    let monitors = if selection.uses_groups() {
        list_group_monitors(source, &selection.groups).await?
    } else {
        list_monitors(source).await?
    };
    let total = monitors.len();
    let filtered = apply_filter(monitors, &selection.filters);
    debug!(total, selected = filtered.len(), "discovery complete");
    Ok(filtered)
}
