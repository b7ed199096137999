use anyhow::Result;
use apm_relay::*;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt::time::FormatTime;

struct LocalTimer;

impl FormatTime for LocalTimer {
    fn format_time(&self, w: &mut tracing_subscriber::fmt::format::Writer<'_>) -> std::fmt::Result {
        write!(
            w,
            "{}",
            chrono::Local::now().format("%Y-%m-%dT%H:%M:%S%.3f%:z")
        )
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_timer(LocalTimer)
        .with_env_filter(filter)
        .init();

    let app_config = config::AppConfig::load()?;
    tracing::info!(
        version = version::VERSION,
        server = %app_config.source.server,
        sink = %app_config.sink.url,
        index = %app_config.sink.index,
        groups = ?app_config.selection.groups,
        filters = app_config.selection.filters.len(),
        "starting {}",
        version::NAME
    );

    let source = Arc::new(apm_repo::ApmRepo::connect(&app_config.source)?);
    let sink = Arc::new(hec_sink::HecSink::connect(&app_config.sink)?);
    let (shutdown_tx, shutdown_rx) = tokio::sync::oneshot::channel();

    let mut worker_handle = worker::spawn(
        worker::WorkerDeps {
            source,
            sink,
            shutdown_rx,
        },
        worker::WorkerConfig {
            interval: app_config.polling.interval(),
            run_once: app_config.polling.run_once,
            selection: app_config.selection.clone(),
        },
    );

    if app_config.polling.run_once {
        worker_handle.await?;
        tracing::info!("Run completed");
        return Ok(());
    }

    tracing::info!(
        interval_secs = app_config.polling.interval_secs,
        "polling; press Ctrl+C to stop"
    );
    tokio::select! {
        result = &mut worker_handle => {
            result?;
        }
        _ = async {
            #[cfg(unix)]
            {
                let mut sigterm = match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
                    Ok(s) => s,
                    Err(_) => {
                        let _ = tokio::signal::ctrl_c().await;
                        return;
                    }
                };
                tokio::select! {
                    _ = tokio::signal::ctrl_c() => {}
                    _ = sigterm.recv() => {}
                }
            }
            #[cfg(not(unix))]
            {
                let _ = tokio::signal::ctrl_c().await;
            }
        } => {
            tracing::info!("Received shutdown signal");
            let _ = shutdown_tx.send(());
            let _ = worker_handle.await;
        }
    }

    Ok(())
}
