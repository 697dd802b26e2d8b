// /////////////////////////////////////////////////////////////////////////////
// HTA Ingestion & Query Adapter
// /////////////////////////////////////////////////////////////////////////////

//! In-memory stand-in for the HTA store, used by tests and the demo binary.
//!
//! The real store is an external collaborator (spec.md §1); this adapter
//! implements the same [`HtaDirectory`]/[`HtaMetric`] ports with a plain
//! sorted `Vec<Sample>` per metric, enough to exercise every operation the
//! write and read pipelines perform without pulling in an actual HTA
//! dependency.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use hta_adapter_domain::entities::MetricConfig;
use hta_adapter_domain::error::HtaError;
use hta_adapter_domain::services::{AggregateRow, FlexRows, HtaDirectory, HtaMetric};
use hta_adapter_domain::value_objects::{Aggregate, MetricName, Sample, TimeRange};

struct InMemoryMetric {
    samples: Mutex<Vec<Sample>>,
}

impl InMemoryMetric {
    fn new() -> Arc<Self> {
        Arc::new(Self {
            samples: Mutex::new(Vec::new()),
        })
    }

    fn aggregate_over(samples: &[Sample], start: i64, end: i64) -> Aggregate {
        let in_range: Vec<&Sample> = samples
            .iter()
            .filter(|s| s.time >= start && s.time <= end)
            .collect();
        if in_range.is_empty() {
            return Aggregate::new(0.0, 0.0, 0.0, 0, 0.0, 0);
        }
        let minimum = in_range.iter().map(|s| s.value).fold(f64::INFINITY, f64::min);
        let maximum = in_range
            .iter()
            .map(|s| s.value)
            .fold(f64::NEG_INFINITY, f64::max);
        let sum: f64 = in_range.iter().map(|s| s.value).sum();
        let count = in_range.len() as u64;
        let active_time = in_range
            .last()
            .map(|s| s.time)
            .zip(in_range.first().map(|s| s.time))
            .map(|(last, first)| last - first)
            .unwrap_or(0);
        Aggregate::new(minimum, maximum, sum, count, sum, active_time)
    }
}

#[async_trait]
impl HtaMetric for InMemoryMetric {
    async fn range(&self) -> Result<TimeRange, HtaError> {
        let samples = self.samples.lock().unwrap_or_else(|e| e.into_inner());
        match (samples.first(), samples.last()) {
            (Some(first), Some(last)) => Ok(TimeRange::new(first.time, last.time)),
            _ => Ok(TimeRange::empty()),
        }
    }

    async fn insert(&self, sample: Sample) -> Result<(), HtaError> {
        let mut samples = self.samples.lock().unwrap_or_else(|e| e.into_inner());
        samples.push(sample);
        Ok(())
    }

    async fn flush(&self) -> Result<(), HtaError> {
        Ok(())
    }

    async fn retrieve(&self, start: i64, end: i64, interval_max: i64) -> Result<Vec<AggregateRow>, HtaError> {
        let samples = self.samples.lock().unwrap_or_else(|e| e.into_inner());
        bucket_rows(&samples, start, end, interval_max)
    }

    async fn retrieve_flex(&self, start: i64, end: i64, interval_max: i64) -> Result<FlexRows, HtaError> {
        let samples = self.samples.lock().unwrap_or_else(|e| e.into_inner());
        let in_range: Vec<Sample> = samples
            .iter()
            .copied()
            .filter(|s| s.time >= start && s.time <= end)
            .collect();
        // Mirrors the store's per-call choice (spec.md §9's open question):
        // thin ranges (few samples relative to the bucket width) are handed
        // back raw; wider ranges are pre-aggregated.
        if in_range.len() <= 4 {
            Ok(FlexRows::Raw(in_range))
        } else {
            Ok(FlexRows::Aggregated(bucket_rows(&samples, start, end, interval_max)?))
        }
    }

    async fn aggregate(&self, start: i64, end: i64) -> Result<Aggregate, HtaError> {
        let samples = self.samples.lock().unwrap_or_else(|e| e.into_inner());
        Ok(Self::aggregate_over(&samples, start, end))
    }

    async fn retrieve_raw(&self, start: i64, end: i64) -> Result<Vec<Sample>, HtaError> {
        let samples = self.samples.lock().unwrap_or_else(|e| e.into_inner());
        if start == i64::MAX && end == i64::MAX {
            // LAST_VALUE's "ts = INT64_MAX, scope {extended, open}" query
            // (spec.md §4.4): the store's nearest-towards-open-start match,
            // not a literal equality filter. All samples sharing the
            // largest timestamp are returned so the caller can detect ties.
            return Ok(match samples.iter().map(|s| s.time).max() {
                Some(max_time) => samples.iter().copied().filter(|s| s.time == max_time).collect(),
                None => Vec::new(),
            });
        }
        Ok(samples
            .iter()
            .copied()
            .filter(|s| s.time >= start && s.time <= end)
            .collect())
    }

    async fn count(&self) -> Result<u64, HtaError> {
        let samples = self.samples.lock().unwrap_or_else(|e| e.into_inner());
        Ok(samples.len() as u64)
    }
}

fn bucket_rows(samples: &[Sample], start: i64, end: i64, interval_max: i64) -> Result<Vec<AggregateRow>, HtaError> {
    if interval_max <= 0 {
        return Err(HtaError::validation("interval_max_ns must be positive"));
    }
    let mut rows = Vec::new();
    let mut bucket_start = start;
    while bucket_start <= end {
        let bucket_end = bucket_start.saturating_add(interval_max).min(end);
        let bucket: Vec<&Sample> = samples
            .iter()
            .filter(|s| s.time >= bucket_start && s.time <= bucket_end)
            .collect();
        if !bucket.is_empty() {
            let minimum = bucket.iter().map(|s| s.value).fold(f64::INFINITY, f64::min);
            let maximum = bucket.iter().map(|s| s.value).fold(f64::NEG_INFINITY, f64::max);
            let sum: f64 = bucket.iter().map(|s| s.value).sum();
            let count = bucket.len() as u64;
            let active_time = bucket
                .last()
                .map(|s| s.time)
                .zip(bucket.first().map(|s| s.time))
                .map(|(last, first)| last - first)
                .unwrap_or(0);
            rows.push(AggregateRow {
                time: bucket_start,
                aggregate: Aggregate::new(minimum, maximum, sum, count, sum, active_time),
            });
        }
        if bucket_end == end {
            break;
        }
        bucket_start = bucket_end + 1;
    }
    Ok(rows)
}

/// An in-memory [`HtaDirectory`] keyed by canonical metric name. Metrics are
/// created lazily on first access or explicitly via `emplace`, matching the
/// contract spec.md §3's Lifecycles section describes for the real store.
pub struct InMemoryDirectory {
    metrics: Mutex<HashMap<MetricName, Arc<InMemoryMetric>>>,
}

impl Default for InMemoryDirectory {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryDirectory {
    pub fn new() -> Self {
        Self {
            metrics: Mutex::new(HashMap::new()),
        }
    }
}

#[async_trait]
impl HtaDirectory for InMemoryDirectory {
    async fn metric(&self, name: &MetricName) -> Result<Arc<dyn HtaMetric>, HtaError> {
        let mut metrics = self.metrics.lock().unwrap_or_else(|e| e.into_inner());
        let handle = metrics.entry(name.clone()).or_insert_with(InMemoryMetric::new);
        Ok(handle.clone() as Arc<dyn HtaMetric>)
    }

    async fn emplace(&self, name: &MetricName, _cfg: &MetricConfig) -> Result<(), HtaError> {
        let mut metrics = self.metrics.lock().unwrap_or_else(|e| e.into_inner());
        metrics.entry(name.clone()).or_insert_with(InMemoryMetric::new);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn name(s: &str) -> MetricName {
        MetricName::new(s).unwrap()
    }

    #[tokio::test]
    async fn metric_is_created_lazily_on_first_access() {
        let dir = InMemoryDirectory::new();
        let handle = dir.metric(&name("a")).await.unwrap();
        assert_eq!(handle.count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn same_name_returns_the_same_handle() {
        let dir = InMemoryDirectory::new();
        let first = dir.metric(&name("a")).await.unwrap();
        first.insert(Sample::new(1, 1.0)).await.unwrap();
        let second = dir.metric(&name("a")).await.unwrap();
        assert_eq!(second.count().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn aggregate_over_range_matches_inserted_samples() {
        let dir = InMemoryDirectory::new();
        let metric = dir.metric(&name("a")).await.unwrap();
        metric.insert(Sample::new(10, 1.0)).await.unwrap();
        metric.insert(Sample::new(12, 3.0)).await.unwrap();
        let agg = metric.aggregate(0, i64::MAX).await.unwrap();
        assert_eq!(agg.count, 2);
        assert_eq!(agg.minimum, 1.0);
        assert_eq!(agg.maximum, 3.0);
        assert_eq!(agg.sum, 4.0);
    }
}
