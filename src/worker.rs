// Polling worker: discovery -> per-monitor fetch -> normalize -> send, once per interval.
// Monitors are handled strictly one after another; a failure only skips the item it hit.

use crate::apm_repo::MonitorSource;
use crate::discovery;
use crate::error::PipelineError;
use crate::hec_sink::EventSink;
use crate::models::{MonitorRef, Selection};
use crate::normalize;
use std::sync::Arc;
use tokio::time::{Duration, interval};
use tracing::instrument;

/// Source, sink, and shutdown for the worker.
pub struct WorkerDeps {
    pub source: Arc<dyn MonitorSource>,
    pub sink: Arc<dyn EventSink>,
    pub shutdown_rx: tokio::sync::oneshot::Receiver<()>,
}

pub struct WorkerConfig {
    pub interval: Duration,
    /// Run one cycle and return.
    pub run_once: bool,
    pub selection: Selection,
}

/// Counters for one cycle.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CycleReport {
    pub monitors_discovered: usize,
    /// Fetched and parsed, whether or not they produced records.
    pub monitors_fetched: usize,
    pub monitors_failed: usize,
    /// Fetched but without a Monitorinfo node.
    pub monitors_empty: usize,
    pub events_sent: usize,
    pub events_failed: usize,
}

/// One full pass. Never fails: every error is logged here and counted in the report.
pub async fn run_cycle(
    source: &dyn MonitorSource,
    sink: &dyn EventSink,
    selection: &Selection,
) -> CycleReport {
    let mut report = CycleReport::default();

    let monitors = match discovery::discover(source, selection).await {
        Ok(m) => m,
        Err(e) => {
            tracing::warn!(
                error = %e,
                operation = "discover",
                "discovery failed; no monitors this cycle"
            );
            Vec::new()
        }
    };
    report.monitors_discovered = monitors.len();
    tracing::info!(monitors = monitors.len(), "monitors selected");

    for monitor in &monitors {
        if let Err(e) = process_monitor(source, sink, monitor, &mut report).await {
            report.monitors_failed += 1;
            tracing::warn!(
                resource_id = %monitor.resource_id,
                display_name = %monitor.display_name,
                error = %e,
                "monitor skipped"
            );
        }
    }
    report
}

async fn process_monitor(
    source: &dyn MonitorSource,
    sink: &dyn EventSink,
    monitor: &MonitorRef,
    report: &mut CycleReport,
) -> Result<(), PipelineError> {
    let xml_text = source
        .fetch_monitor_data(&monitor.resource_id)
        .await
        .map_err(|e| PipelineError::MonitorFetchFailed {
            resource_id: monitor.resource_id.clone(),
            source: e,
        })?;
    let records = normalize::normalize_document(&xml_text)?;
    report.monitors_fetched += 1;

    if records.is_empty() {
        report.monitors_empty += 1;
        tracing::debug!(resource_id = %monitor.resource_id, "no Monitorinfo in response");
        return Ok(());
    }

    for record in &records {
        match sink.send(record).await {
            Ok(()) => report.events_sent += 1,
            Err(e) => {
                report.events_failed += 1;
                let e = PipelineError::DeliveryFailed(e);
                tracing::warn!(
                    resource_id = %monitor.resource_id,
                    source = record.source(),
                    error = %e,
                    "event dropped"
                );
            }
        }
    }
    Ok(())
}

/// Spawns the polling loop. The first cycle starts immediately; shutdown is observed
/// between cycles.
pub fn spawn(deps: WorkerDeps, config: WorkerConfig) -> tokio::task::JoinHandle<()> {
    tokio::spawn(run(deps, config))
}

#[instrument(skip_all, fields(interval_secs = config.interval.as_secs()))]
async fn run(deps: WorkerDeps, config: WorkerConfig) {
    let WorkerDeps {
        source,
        sink,
        mut shutdown_rx,
    } = deps;

    let mut tick = interval(config.interval);
    tick.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);

    let mut cycles_total: u64 = 0;
    let mut events_sent_total: u64 = 0;

    loop {
        tokio::select! {
            biased;
            _ = &mut shutdown_rx => {
                tracing::debug!("Worker shutting down");
                break;
            }
            _ = tick.tick() => {
                let report = run_cycle(source.as_ref(), sink.as_ref(), &config.selection).await;
                cycles_total += 1;
                events_sent_total += report.events_sent as u64;
                tracing::info!(
                    monitors = report.monitors_discovered,
                    monitors_failed = report.monitors_failed,
                    monitors_empty = report.monitors_empty,
                    events_sent = report.events_sent,
                    events_failed = report.events_failed,
                    cycles_total,
                    events_sent_total,
                    "cycle complete"
                );
                if config.run_once {
                    break;
                }
            }
        }
    }
}
