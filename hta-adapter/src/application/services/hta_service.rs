// /////////////////////////////////////////////////////////////////////////////
// HTA Ingestion & Query Adapter
// /////////////////////////////////////////////////////////////////////////////

//! The service façade (spec.md §4.7): configure/reconfigure, accept
//! async read/write requests, own the mapping table and strand table.
//!
//! The façade is constructed with an already-built [`HtaDirectory`] — unlike
//! the original, which constructs its store from the raw config blob inside
//! `configure`, this crate takes the store as a dependency so the façade
//! never needs to know the concrete store type (see `DESIGN.md`). `threads`
//! is still validated and its immutability enforced across reconfigures, but
//! the worker pool it names is the ambient tokio runtime set up by
//! `hta-adapter-bootstrap`, not something this façade creates itself.

use std::sync::Arc;
use std::time::Instant;

use hta_adapter_domain::entities::MetricConfig;
use hta_adapter_domain::error::HtaError;
use hta_adapter_domain::services::{HtaDirectory, MappingTable, StatsCollector};
use hta_adapter_domain::value_objects::{DataChunk, HistoryRequest, HistoryResponse, InputName, MetricName};
use tokio::sync::Mutex as AsyncMutex;
use tracing::error;

use crate::application::services::{read_pipeline, write_pipeline};
use crate::infrastructure::config::service_config::{LoggingConfig, ServiceConfig};
use crate::infrastructure::runtime::StrandTable;

/// One `(input, name)` pair from the current mapping table, as returned by
/// `configure`/`reconfigure` (spec.md §6).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Subscription {
    pub input: InputName,
    pub name: MetricName,
}

struct ConfiguredState {
    threads: usize,
    logging: LoggingConfig,
}

pub struct HtaService {
    directory: Arc<dyn HtaDirectory>,
    mapping: MappingTable,
    strands: StrandTable,
    read_stats: Arc<StatsCollector>,
    write_stats: Arc<StatsCollector>,
    state: AsyncMutex<Option<ConfiguredState>>,
}

impl HtaService {
    pub fn new(directory: Arc<dyn HtaDirectory>) -> Self {
        Self {
            directory,
            mapping: MappingTable::new(),
            strands: StrandTable::new(),
            read_stats: Arc::new(StatsCollector::new()),
            write_stats: Arc::new(StatsCollector::new()),
            state: AsyncMutex::new(None),
        }
    }

    pub fn read_stats(&self) -> Arc<StatsCollector> {
        self.read_stats.clone()
    }

    pub fn write_stats(&self) -> Arc<StatsCollector> {
        self.write_stats.clone()
    }

    pub async fn strand_count(&self) -> usize {
        self.strands.strand_count().await
    }

    /// Total strand jobs that panicked instead of completing, across every
    /// metric this service has touched (SPEC_FULL §4.8).
    pub fn panics_caught(&self) -> u64 {
        self.strands.panics_caught()
    }

    pub fn mapping_table_size(&self) -> usize {
        self.mapping.subscriptions().len()
    }

    /// First call creates the configured state; later calls may only add
    /// metrics and must repeat the same `threads` (spec.md §3 Lifecycles,
    /// §4.7).
    pub async fn configure(&self, config: ServiceConfig) -> Result<Vec<Subscription>, HtaError> {
        config.validate()?;
        let mut state = self.state.lock().await;
        match state.as_ref() {
            Some(existing) if existing.threads != config.threads => {
                return Err(HtaError::invalid_config(
                    "threads cannot change after the first configure",
                ));
            }
            _ => {}
        }

        self.apply_metrics(&config).await?;

        if state.is_none() {
            *state = Some(ConfiguredState {
                threads: config.threads,
                logging: config.logging.clone(),
            });
        }
        drop(state);

        Ok(self.subscription_list())
    }

    /// Validates the whole batch of new metrics before registering any of
    /// them, so a conflict partway through the config leaves the mapping
    /// table byte-identical to before the call (spec.md §8's "Mapping
    /// uniqueness" property) rather than partially applied.
    async fn apply_metrics(&self, config: &ServiceConfig) -> Result<(), HtaError> {
        let mut candidates: Vec<(MetricName, InputName, &MetricConfig)> = Vec::new();

        for (key, cfg) in &config.metrics {
            let alias = cfg.input.clone().unwrap_or_else(|| key.clone());
            let input = InputName::new(alias)?;
            if self.mapping.contains_input(&input) {
                continue;
            }
            let name = MetricName::new(key.clone())?;
            if self.mapping.contains_name(&name) || candidates.iter().any(|(n, _, _)| n == &name) {
                return Err(HtaError::AmbiguousMapping {
                    name: name.into_string(),
                });
            }
            if candidates.iter().any(|(_, i, _)| i == &input) {
                return Err(HtaError::DuplicateInput {
                    input: input.into_string(),
                });
            }
            candidates.push((name, input, cfg));
        }

        for (name, input, cfg) in candidates {
            self.directory.emplace(&name, cfg).await?;
            self.mapping.register(input, name)?;
        }
        Ok(())
    }

    fn subscription_list(&self) -> Vec<Subscription> {
        let mut subs: Vec<Subscription> = self
            .mapping
            .subscriptions()
            .into_iter()
            .map(|(input, name)| Subscription { input, name })
            .collect();
        subs.sort_by(|a, b| a.input.as_str().cmp(b.input.as_str()));
        subs
    }

    /// Resolves `input` through the mapping table and posts a write to the
    /// resolved metric's strand. Resolves once the write has been
    /// acknowledged, surfacing a `StoreFailure` as an `Err` the way
    /// `read()` surfaces read failures — spec.md §4.3 step 4 and §7's
    /// `StoreFailure` row both require the completion to carry the error,
    /// not just log it.
    pub async fn write(&self, input: InputName, chunk: DataChunk) -> Result<(), HtaError> {
        let logging = self.logging_config().await?;
        let name = self.mapping.resolve(&input);
        self.write_stats.pending();
        let pending_since = Instant::now();

        let directory = self.directory.clone();
        let write_stats = self.write_stats.clone();
        let name_for_job = name.clone();
        let (ack_tx, ack_rx) = tokio::sync::oneshot::channel();

        self.strands
            .post(&name, async move {
                let result = write_pipeline::run_write(
                    directory.as_ref(),
                    &write_stats,
                    &name_for_job,
                    chunk,
                    pending_since,
                    logging.nan_values,
                    logging.non_monotonic_values,
                )
                .await;
                if let Err(err) = &result {
                    error!(metric = %name_for_job, error = %err, "write failed");
                }
                let _ = ack_tx.send(result);
            })
            .await;

        ack_rx
            .await
            .map_err(|_| HtaError::internal("write task dropped its response channel"))?
    }

    /// Posts a read to `name`'s strand, using `name` directly as the
    /// canonical metric name (history requests address canonical names,
    /// spec.md §4.7 — they are not resolved through the mapping table).
    pub async fn read(&self, name: MetricName, request: HistoryRequest) -> Result<HistoryResponse, HtaError> {
        self.logging_config().await?;
        self.read_stats.pending();
        let pending_since = Instant::now();

        let directory = self.directory.clone();
        let read_stats = self.read_stats.clone();
        let name_for_job = name.clone();
        let (tx, rx) = tokio::sync::oneshot::channel();

        self.strands
            .post(&name, async move {
                let result =
                    read_pipeline::run_read(directory.as_ref(), &read_stats, &name_for_job, &request, pending_since)
                        .await;
                let _ = tx.send(result);
            })
            .await;

        rx.await
            .map_err(|_| HtaError::internal("read task dropped its response channel"))?
    }

    async fn logging_config(&self) -> Result<LoggingConfig, HtaError> {
        self.state
            .lock()
            .await
            .as_ref()
            .map(|s| s.logging.clone())
            .ok_or_else(|| HtaError::invalid_config("service has not been configured"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::adapters::InMemoryDirectory;
    use async_trait::async_trait;
    use hta_adapter_domain::services::{AggregateRow, FlexRows, HtaMetric};
    use hta_adapter_domain::value_objects::{Aggregate, HistoryRequestKind, Sample, TimeRange};
    use std::collections::HashMap;

    fn service() -> HtaService {
        HtaService::new(Arc::new(InMemoryDirectory::new()))
    }

    /// A metric handle whose `insert` always fails, for exercising the
    /// `StoreFailure` path (spec.md §7) that `InMemoryMetric` — which never
    /// fails — can't exercise.
    struct FailingMetric;

    #[async_trait]
    impl HtaMetric for FailingMetric {
        async fn range(&self) -> Result<TimeRange, HtaError> {
            Ok(TimeRange::empty())
        }

        async fn insert(&self, _sample: Sample) -> Result<(), HtaError> {
            Err(HtaError::store_failure("simulated disk failure"))
        }

        async fn flush(&self) -> Result<(), HtaError> {
            Ok(())
        }

        async fn retrieve(&self, _start: i64, _end: i64, _interval_max: i64) -> Result<Vec<AggregateRow>, HtaError> {
            Ok(Vec::new())
        }

        async fn retrieve_flex(&self, _start: i64, _end: i64, _interval_max: i64) -> Result<FlexRows, HtaError> {
            Ok(FlexRows::Raw(Vec::new()))
        }

        async fn aggregate(&self, _start: i64, _end: i64) -> Result<Aggregate, HtaError> {
            Ok(Aggregate::new(0.0, 0.0, 0.0, 0, 0.0, 0))
        }

        async fn retrieve_raw(&self, _start: i64, _end: i64) -> Result<Vec<Sample>, HtaError> {
            Ok(Vec::new())
        }

        async fn count(&self) -> Result<u64, HtaError> {
            Ok(0)
        }
    }

    /// An `HtaDirectory` whose every metric handle is a [`FailingMetric`].
    struct FailingDirectory;

    #[async_trait]
    impl HtaDirectory for FailingDirectory {
        async fn metric(&self, _name: &MetricName) -> Result<Arc<dyn HtaMetric>, HtaError> {
            Ok(Arc::new(FailingMetric))
        }

        async fn emplace(&self, _name: &MetricName, _cfg: &MetricConfig) -> Result<(), HtaError> {
            Ok(())
        }
    }

    fn metrics_config(pairs: &[(&str, Option<&str>)]) -> ServiceConfig {
        let mut metrics = HashMap::new();
        for (name, input) in pairs {
            let json = match input {
                Some(alias) => serde_json::json!({ "input": alias }),
                None => serde_json::json!({}),
            };
            metrics.insert((*name).to_string(), serde_json::from_value(json).unwrap());
        }
        ServiceConfig {
            threads: 2,
            metrics,
            logging: LoggingConfig::default(),
            stats: None,
        }
    }

    #[tokio::test]
    async fn configure_returns_the_expected_subscription_list() {
        let svc = service();
        let subs = svc
            .configure(metrics_config(&[("a", None), ("b", Some("b.raw"))]))
            .await
            .unwrap();

        assert_eq!(
            subs,
            vec![
                Subscription {
                    input: InputName::new("a").unwrap(),
                    name: MetricName::new("a").unwrap()
                },
                Subscription {
                    input: InputName::new("b.raw").unwrap(),
                    name: MetricName::new("b").unwrap()
                },
            ]
        );
    }

    #[tokio::test]
    async fn reusing_an_input_across_two_metrics_fails_and_leaves_service_unchanged() {
        // Same input aliased to two distinct metric names; a mapping
        // uniqueness violation per spec.md §8, though by the precise §4.2
        // definitions it surfaces as `DuplicateInput` rather than the
        // `AmbiguousMapping` variant — see DESIGN.md.
        let svc = service();
        let err = svc
            .configure(metrics_config(&[("x", None), ("y", Some("x"))]))
            .await
            .unwrap_err();
        assert_eq!(err.category(), "configuration");
        assert_eq!(svc.mapping_table_size(), 0);
    }

    #[tokio::test]
    async fn reconfigure_rejects_a_changed_thread_count() {
        let svc = service();
        svc.configure(metrics_config(&[("a", None)])).await.unwrap();
        let mut second = metrics_config(&[("b", None)]);
        second.threads = 4;
        let err = svc.configure(second).await.unwrap_err();
        assert_eq!(err.category(), "configuration");
    }

    #[tokio::test]
    async fn reconfigure_adds_new_metrics_and_keeps_existing_mappings() {
        let svc = service();
        svc.configure(metrics_config(&[("a", None)])).await.unwrap();
        let subs = svc.configure(metrics_config(&[("a", None), ("b", None)])).await.unwrap();
        assert_eq!(subs.len(), 2);
    }

    #[tokio::test]
    async fn write_then_read_round_trips_through_the_facade() {
        let svc = service();
        svc.configure(metrics_config(&[("a", None)])).await.unwrap();
        svc.write(
            InputName::new("a").unwrap(),
            DataChunk::new(vec![Sample::new(10, 1.0), Sample::new(12, 3.0)]),
        )
        .await
        .unwrap();

        let response = svc
            .read(
                MetricName::new("a").unwrap(),
                HistoryRequest::new(HistoryRequestKind::Aggregate, 0, i64::MAX, 1),
            )
            .await
            .unwrap();

        assert_eq!(response.aggregate[0].count, 2);
    }

    #[tokio::test]
    async fn write_before_configure_is_rejected() {
        let svc = service();
        let err = svc
            .write(InputName::new("a").unwrap(), DataChunk::new(vec![]))
            .await
            .unwrap_err();
        assert_eq!(err.category(), "configuration");
    }

    #[tokio::test]
    async fn write_surfaces_a_store_failure_instead_of_swallowing_it() {
        let svc = HtaService::new(Arc::new(FailingDirectory));
        svc.configure(metrics_config(&[("a", None)])).await.unwrap();

        let err = svc
            .write(InputName::new("a").unwrap(), DataChunk::new(vec![Sample::new(1, 1.0)]))
            .await
            .unwrap_err();

        assert_eq!(err.category(), "store");
        let snap = svc.write_stats().collect();
        assert_eq!(snap.failed_count, 1);
        assert_eq!(snap.completed_count, 0);
    }
}
