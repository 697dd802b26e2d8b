// /////////////////////////////////////////////////////////////////////////////
// HTA Ingestion & Query Adapter
// /////////////////////////////////////////////////////////////////////////////

//! Ambient Prometheus self-instrumentation (SPEC_FULL §4.8): process-level
//! gauges distinct from the `StatsMetrics` time-series spec.md §4.6 pushes
//! onto the output bus. Modeled on the teacher's `MetricsService` —
//! `Registry::new()`, one `Opts`/`with_opts` per metric, registration
//! failures wrapped into the crate's own error type.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use hta_adapter_domain::error::HtaError;
use prometheus::{IntCounter, IntGauge, Opts, Registry};

#[derive(Clone)]
pub struct SelfMetrics {
    registry: Arc<Registry>,
    strand_count: IntGauge,
    mapping_table_size: IntGauge,
    runtime_panics_caught: IntCounter,
    panics_synced: Arc<AtomicU64>,
}

impl SelfMetrics {
    pub fn new() -> Result<Self, HtaError> {
        let registry = Registry::new();

        let strand_count = IntGauge::with_opts(
            Opts::new("strand_count", "Number of distinct metric strands created").namespace("hta_adapter"),
        )
        .map_err(|e| HtaError::internal(format!("failed to create strand_count metric: {e}")))?;

        let mapping_table_size = IntGauge::with_opts(
            Opts::new("mapping_table_size", "Number of registered input-to-metric mappings")
                .namespace("hta_adapter"),
        )
        .map_err(|e| HtaError::internal(format!("failed to create mapping_table_size metric: {e}")))?;

        let runtime_panics_caught = IntCounter::with_opts(
            Opts::new("runtime_panics_caught_total", "Strand jobs that panicked instead of completing")
                .namespace("hta_adapter"),
        )
        .map_err(|e| HtaError::internal(format!("failed to create runtime_panics_caught metric: {e}")))?;

        registry
            .register(Box::new(strand_count.clone()))
            .map_err(|e| HtaError::internal(format!("failed to register strand_count metric: {e}")))?;
        registry
            .register(Box::new(mapping_table_size.clone()))
            .map_err(|e| HtaError::internal(format!("failed to register mapping_table_size metric: {e}")))?;
        registry
            .register(Box::new(runtime_panics_caught.clone()))
            .map_err(|e| HtaError::internal(format!("failed to register runtime_panics_caught metric: {e}")))?;

        Ok(Self {
            registry: Arc::new(registry),
            strand_count,
            mapping_table_size,
            runtime_panics_caught,
            panics_synced: Arc::new(AtomicU64::new(0)),
        })
    }

    pub fn set_strand_count(&self, count: usize) {
        self.strand_count.set(count as i64);
    }

    pub fn set_mapping_table_size(&self, size: usize) {
        self.mapping_table_size.set(size as i64);
    }

    pub fn record_panic_caught(&self) {
        self.runtime_panics_caught.inc();
    }

    /// Reconciles the counter against `StrandTable::panics_caught`'s
    /// running total, incrementing by only the delta since the last sync so
    /// the Prometheus counter stays monotonic under repeated polling (used
    /// by `hta-adapter-bootstrap`'s periodic gauge refresh, the same way
    /// `set_strand_count`/`set_mapping_table_size` are).
    pub fn sync_panics_caught(&self, total: u64) {
        let previous = self.panics_synced.swap(total, Ordering::Relaxed);
        if total > previous {
            self.runtime_panics_caught.inc_by(total - previous);
        }
    }

    /// Renders the registry in Prometheus text exposition format, for an
    /// HTTP scrape endpoint owned by `hta-adapter-bootstrap`.
    pub fn render(&self) -> Result<String, HtaError> {
        use prometheus::Encoder;
        let encoder = prometheus::TextEncoder::new();
        let metric_families = self.registry.gather();
        let mut buffer = Vec::new();
        encoder
            .encode(&metric_families, &mut buffer)
            .map_err(|e| HtaError::internal(format!("failed to encode metrics: {e}")))?;
        String::from_utf8(buffer).map_err(|e| HtaError::internal(format!("metrics output was not utf-8: {e}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn gauges_are_reflected_in_rendered_output() {
        let metrics = SelfMetrics::new().unwrap();
        metrics.set_strand_count(3);
        metrics.set_mapping_table_size(7);
        metrics.record_panic_caught();

        let rendered = metrics.render().unwrap();
        assert!(rendered.contains("hta_adapter_strand_count 3"));
        assert!(rendered.contains("hta_adapter_mapping_table_size 7"));
        assert!(rendered.contains("hta_adapter_runtime_panics_caught_total 1"));
    }

    #[test]
    fn sync_panics_caught_applies_only_the_delta_each_poll() {
        let metrics = SelfMetrics::new().unwrap();
        metrics.sync_panics_caught(3);
        metrics.sync_panics_caught(3);
        metrics.sync_panics_caught(5);

        let rendered = metrics.render().unwrap();
        assert!(rendered.contains("hta_adapter_runtime_panics_caught_total 5"));
    }
}
