// Discovery: flat listing, group resolution, filtering

mod common;

use apm_relay::discovery::{apply_filter, discover, list_group_monitors, list_monitors};
use apm_relay::error::PipelineError;
use apm_relay::models::{FilterSpec, Selection};
use common::{FakeSource, GROUP_LIST, group_members, monitor_list};

fn ids(monitors: &[apm_relay::models::MonitorRef]) -> Vec<&str> {
    monitors.iter().map(|m| m.resource_id.as_str()).collect()
}

#[tokio::test]
async fn test_list_monitors_parses_flat_list() {
    let source = FakeSource::default().with_monitor_list(monitor_list(&[
        ("1", &[]),
        ("2", &[]),
        ("3", &[]),
    ]));
    let monitors = list_monitors(&source).await.unwrap();
    assert_eq!(ids(&monitors), ["1", "2", "3"]);
}

#[tokio::test]
async fn test_list_monitors_missing_section_is_empty() {
    let source = FakeSource::default()
        .with_monitor_list("<AppManager-response><result/></AppManager-response>");
    assert!(list_monitors(&source).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_list_monitors_transport_failure_is_discovery_unavailable() {
    let source = FakeSource::default();
    let err = list_monitors(&source).await.unwrap_err();
    assert!(matches!(err, PipelineError::DiscoveryUnavailable(_)));
}

#[tokio::test]
async fn test_list_monitors_unparsable_is_discovery_unavailable() {
    let source = FakeSource::default().with_monitor_list("<<<");
    let err = list_monitors(&source).await.unwrap_err();
    assert!(matches!(err, PipelineError::DiscoveryUnavailable(_)));
}

#[tokio::test]
async fn test_group_monitors_resolves_exact_names_and_skips_unknown() {
    let source = FakeSource::default()
        .with_group_list(GROUP_LIST)
        .with_group_details("20001", group_members(&[("101", "web-1"), ("102", "web-2")]))
        .with_group_details("20003", group_members(&[("301", "pg-1")]));

    let names = vec![
        "Linux Group".to_string(),
        "DB Servers".to_string(),
        "No Such Group".to_string(),
        "windows group".to_string(),
    ];
    let monitors = list_group_monitors(&source, &names).await.unwrap();
    assert_eq!(ids(&monitors), ["101", "102", "301"]);
    assert_eq!(source.detail_calls(), ["20001", "20003"]);
}

#[tokio::test]
async fn test_group_monitors_skips_failing_group_and_dedups() {
    let source = FakeSource::default()
        .with_group_list(GROUP_LIST)
        .with_group_details("20001", group_members(&[("101", "web-1"), ("301", "pg-1")]))
        .with_group_details("20003", group_members(&[("301", "pg-1"), ("302", "pg-2")]));

    let names = vec![
        "Linux Group".to_string(),
        "Windows Group".to_string(),
        "DB Servers".to_string(),
    ];
    let monitors = list_group_monitors(&source, &names).await.unwrap();
    assert_eq!(ids(&monitors), ["101", "301", "302"]);
    assert_eq!(source.detail_calls(), ["20001", "20002", "20003"]);
}

#[tokio::test]
async fn test_group_monitors_group_list_failure_is_discovery_unavailable() {
    let source = FakeSource::default();
    let err = list_group_monitors(&source, &["Linux Group".to_string()])
        .await
        .unwrap_err();
    assert!(matches!(err, PipelineError::DiscoveryUnavailable(_)));
}

#[tokio::test]
async fn test_apply_filter_preserves_order() {
    let source = FakeSource::default().with_monitor_list(monitor_list(&[
        ("1", &[("TYPE", "Linux")]),
        ("2", &[("TYPE", "Windows")]),
        ("3", &[("TYPE", "LINUX")]),
    ]));
    let monitors = list_monitors(&source).await.unwrap();
    let filtered = apply_filter(monitors, &FilterSpec::new().with("type", "linux"));
    assert_eq!(ids(&filtered), ["1", "3"]);
}

#[tokio::test]
async fn test_discover_flat_with_availability_filter() {
    let source = FakeSource::default().with_monitor_list(monitor_list(&[
        ("1", &[("AVAILABILITYATTRIBUTEID", "700")]),
        ("2", &[("AVAILABILITYATTRIBUTEID", "999")]),
    ]));
    let selection = Selection {
        filters: FilterSpec::new().with("AVAILABILITYATTRIBUTEID", ["700"]),
        groups: vec![],
    };
    let monitors = discover(&source, &selection).await.unwrap();
    assert_eq!(ids(&monitors), ["1"]);
}

#[tokio::test]
async fn test_discover_uses_groups_when_configured() {
    let source = FakeSource::default()
        .with_monitor_list(monitor_list(&[("999", &[])]))
        .with_group_list(GROUP_LIST)
        .with_group_details("20001", group_members(&[("101", "web-1")]));
    let selection = Selection {
        filters: FilterSpec::new(),
        groups: vec!["Linux Group".to_string()],
    };
    let monitors = discover(&source, &selection).await.unwrap();
    assert_eq!(ids(&monitors), ["101"]);
}
