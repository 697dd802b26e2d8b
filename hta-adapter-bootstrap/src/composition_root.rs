// /////////////////////////////////////////////////////////////////////////////
// HTA Ingestion & Query Adapter
// /////////////////////////////////////////////////////////////////////////////

//! Wires the configured service and its ambient collaborators together.
//!
//! Mirrors the teacher's composition root in spirit (one place that owns
//! construction order and dependency wiring) scaled down to what this
//! service actually has: a store, the façade, optional self-telemetry, and
//! Prometheus self-instrumentation. The real HTA store stays out of scope
//! (spec.md §1 treats it as an external interface); `InMemoryDirectory`
//! stands in for it here as it does in `hta-adapter`'s own tests.

use std::sync::Arc;

use hta_adapter::{ConfigService, HtaService, InMemoryDirectory, ObservabilityConfig, SelfMetrics, StatsMetrics};
use hta_adapter_domain::error::HtaError;
use tracing::info;

use crate::config::BootstrapConfig;
use crate::shutdown::ShutdownCoordinator;

/// Everything `app_runner` needs to drive the process: the configured
/// façade, self-instrumentation, and the stats loop's shutdown receiver (if
/// telemetry is enabled).
pub struct Application {
    pub service: Arc<HtaService>,
    pub self_metrics: SelfMetrics,
    pub stats_task: Option<tokio::task::JoinHandle<()>>,
}

/// Loads the ambient observability config, so the logger can be initialized
/// before anything else starts emitting `tracing` events.
pub async fn load_observability(config: &BootstrapConfig) -> Result<ObservabilityConfig, HtaError> {
    match config.observability_config_path() {
        Some(path) => ConfigService::load_observability_config(path).await,
        None => Ok(ObservabilityConfig::default()),
    }
}

/// Loads the service configuration, builds the service, configures it, and
/// spawns the stats telemetry loop if the service config enables it.
pub async fn build(config: &BootstrapConfig, shutdown: &mut ShutdownCoordinator) -> Result<Application, HtaError> {
    let service_config = ConfigService::load_service_config(config.service_config_path()).await?;
    let stats_config = service_config.stats.clone();

    let directory = Arc::new(InMemoryDirectory::new());
    let service = Arc::new(HtaService::new(directory));
    let subscriptions = service.configure(service_config).await?;
    info!(subscriptions = subscriptions.len(), "service configured");

    let self_metrics = SelfMetrics::new()?;
    self_metrics.set_mapping_table_size(service.mapping_table_size());
    self_metrics.set_strand_count(service.strand_count().await);
    self_metrics.sync_panics_caught(service.panics_caught());

    let stats_task = match stats_config {
        Some(stats) => {
            let metrics = StatsMetrics::new(stats.prefix, stats.rate);
            let read_stats = service.read_stats();
            let write_stats = service.write_stats();
            let stats_shutdown = shutdown.subscribe();

            Some(tokio::spawn(async move {
                hta_adapter::run_stats_loop(
                    metrics,
                    read_stats,
                    write_stats,
                    |point| {
                        info!(
                            series = %point.name,
                            value = point.value,
                            rate = point.rate,
                            scope = point.scope,
                            "telemetry"
                        );
                    },
                    stats_shutdown,
                )
                .await;
            }))
        }
        None => None,
    };

    Ok(Application {
        service,
        self_metrics,
        stats_task,
    })
}
