// APM XML response parsing. Element and attribute names here are the API contract.

use crate::error::PipelineError;
use crate::models::{
    AttributeMap, MonitorGroup, MonitorPayload, MonitorRef, RawAttribute, RawEntity,
};
use roxmltree::{Document, Node, ParsingOptions};

/// Parses a `ListMonitor` response. `Ok(None)` when `result/response` is missing.
pub fn parse_monitor_list(xml_text: &str) -> Result<Option<Vec<MonitorRef>>, PipelineError> {
    let doc = parse(xml_text)?;
    let Some(response) = find_path(doc.root_element(), &["result", "response"]) else {
        return Ok(None);
    };
    let monitors = child_elements(response, "Monitor")
        .filter_map(|node| MonitorRef::from_attributes(attribute_map(node)))
        .collect();
    Ok(Some(monitors))
}

/// Parses a `ListMonitorGroups` response: every `MonitorGroup` element at any depth.
pub fn parse_group_list(xml_text: &str) -> Result<Vec<MonitorGroup>, PipelineError> {
    let doc = parse(xml_text)?;
    let groups = doc
        .descendants()
        .filter(|n| n.is_element() && n.has_tag_name("MonitorGroup"))
        .filter_map(|node| {
            let group_id = node.attribute("RESOURCEID")?;
            Some(MonitorGroup {
                display_name: node
                    .attribute("DISPLAYNAME")
                    .unwrap_or_default()
                    .trim()
                    .to_string(),
                group_id: group_id.to_string(),
            })
        })
        .collect();
    Ok(groups)
}

/// Parses a `ListMGDetails` response: every `Monitors` element at any depth, keeping only
/// resource id and display name.
pub fn parse_group_members(xml_text: &str) -> Result<Vec<MonitorRef>, PipelineError> {
    let doc = parse(xml_text)?;
    let members = doc
        .descendants()
        .filter(|n| n.is_element() && n.has_tag_name("Monitors"))
        .filter_map(|node| {
            let mut attrs = AttributeMap::new();
            for key in ["RESOURCEID", "DISPLAYNAME"] {
                if let Some(value) = node.attribute(key) {
                    attrs.insert(key, value);
                }
            }
            MonitorRef::from_attributes(attrs)
        })
        .collect();
    Ok(members)
}

/// Parses a `GetMonitorData` response. A missing `result/response/Monitorinfo` gives a
/// payload with no main entity.
pub fn parse_monitor_data(xml_text: &str) -> Result<MonitorPayload, PipelineError> {
    let doc = parse(xml_text)?;
    let Some(info) = find_path(doc.root_element(), &["result", "response", "Monitorinfo"]) else {
        return Ok(MonitorPayload::default());
    };

    let main = raw_entity(info, "Attribute");
    let child_groups = child_elements(info, "CHILDMONITORS")
        .map(|container| {
            child_elements(container, "CHILDMONITORINFO")
                .map(|child| raw_entity(child, "CHILDATTRIBUTES"))
                .collect()
        })
        .collect();

    Ok(MonitorPayload {
        main: Some(main),
        child_groups,
    })
}

/// APM responses may carry a DOCTYPE prolog; it is accepted and otherwise ignored.
fn parse(xml_text: &str) -> Result<Document<'_>, PipelineError> {
    let options = ParsingOptions {
        allow_dtd: true,
        ..ParsingOptions::default()
    };
    Ok(Document::parse_with_options(xml_text, options)?)
}

fn raw_entity(node: Node<'_, '_>, attribute_tag: &'static str) -> RawEntity {
    RawEntity {
        fields: node
            .attributes()
            .map(|a| (a.name().to_string(), a.value().to_string()))
            .collect(),
        attributes: child_elements(node, attribute_tag)
            .filter_map(raw_attribute)
            .collect(),
    }
}

/// Name is `DISPLAYNAME`, falling back to `AttributeID`; nodes with neither are skipped.
fn raw_attribute(node: Node<'_, '_>) -> Option<RawAttribute> {
    let name = ["DISPLAYNAME", "AttributeID"]
        .into_iter()
        .filter_map(|key| node.attribute(key))
        .find(|name| !name.is_empty())?;
    Some(RawAttribute::new(
        name,
        node.attribute("Units"),
        node.attribute("Value"),
    ))
}

fn attribute_map(node: Node<'_, '_>) -> AttributeMap {
    node.attributes().map(|a| (a.name(), a.value())).collect()
}

fn child_elements<'a, 'input: 'a>(
    node: Node<'a, 'input>,
    tag: &'a str,
) -> impl Iterator<Item = Node<'a, 'input>> + 'a {
    node.children()
        .filter(move |n| n.is_element() && n.has_tag_name(tag))
}

fn find_path<'a, 'input>(
    node: Node<'a, 'input>,
    path: &[&'static str],
) -> Option<Node<'a, 'input>> {
    path.iter()
        .try_fold(node, |current, &tag| child_elements(current, tag).next())
}
