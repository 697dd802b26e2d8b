// /////////////////////////////////////////////////////////////////////////////
// HTA Ingestion & Query Adapter
// /////////////////////////////////////////////////////////////////////////////

//! The write pipeline: monotonic-time and finite-value filtering, insertion,
//! and flush, all running under a metric's strand (spec.md §4.3).

use std::sync::Arc;
use std::time::{Duration, Instant};

use hta_adapter_domain::error::HtaError;
use hta_adapter_domain::services::{HtaDirectory, StatsCollector, StatsTransaction};
use hta_adapter_domain::value_objects::{DataChunk, MetricName};
use tracing::{debug, warn};

const SLOW_WRITE_THRESHOLD: Duration = Duration::from_secs(1);

/// Counts of samples dropped by the two write-time filters, for
/// `logging.nan_values`/`logging.non_monotonic_values`-gated warnings.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct SkipCounts {
    pub skip_non_monotonic: u64,
    pub skip_nan: u64,
}

/// Runs one write under `name`'s strand: fetch the current watermark, filter
/// and insert the chunk in order, flush, and record stats.
///
/// `pending_since` is the instant the write was submitted (used to compute
/// the pending duration recorded on the stats transaction).
pub async fn run_write(
    directory: &dyn HtaDirectory,
    stats: &StatsCollector,
    name: &MetricName,
    chunk: DataChunk,
    pending_since: Instant,
    log_nan: bool,
    log_non_monotonic: bool,
) -> Result<(), HtaError> {
    let tx = StatsTransaction::begin(stats, pending_since);
    match run_write_inner(directory, name, chunk, log_nan, log_non_monotonic).await {
        Ok(bytes_written) => {
            tx.complete(bytes_written as u64);
            Ok(())
        }
        Err(err) => {
            // `tx` records a failure via Drop; we still propagate the error
            // so the strand boundary can log it fatally per spec.md §7.
            Err(err)
        }
    }
}

async fn run_write_inner(
    directory: &dyn HtaDirectory,
    name: &MetricName,
    chunk: DataChunk,
    log_nan: bool,
    log_non_monotonic: bool,
) -> Result<usize, HtaError> {
    let start = Instant::now();
    let metric = directory.metric(name).await?;
    let mut max_ts = metric.range().await?.max_time;
    let mut skips = SkipCounts::default();

    for sample in &chunk.samples {
        if sample.time <= max_ts {
            skips.skip_non_monotonic += 1;
            continue;
        }
        if !sample.is_finite() {
            skips.skip_nan += 1;
            continue;
        }
        metric.insert(*sample).await?;
        max_ts = sample.time;
    }
    metric.flush().await?;

    if log_non_monotonic && skips.skip_non_monotonic > 0 {
        warn!(metric = %name, count = skips.skip_non_monotonic, "skipped non-monotonic samples");
    }
    if log_nan && skips.skip_nan > 0 {
        warn!(metric = %name, count = skips.skip_nan, "skipped non-finite samples");
    }

    let elapsed = start.elapsed();
    if elapsed > SLOW_WRITE_THRESHOLD {
        warn!(metric = %name, elapsed_ms = elapsed.as_millis() as u64, "slow write");
    } else {
        debug!(metric = %name, elapsed_ms = elapsed.as_millis() as u64, "write completed");
    }

    Ok(chunk.byte_size())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::adapters::InMemoryDirectory;
    use hta_adapter_domain::value_objects::Sample;

    fn name(s: &str) -> MetricName {
        MetricName::new(s).unwrap()
    }

    #[tokio::test]
    async fn monotonic_and_nan_samples_are_filtered() {
        let directory = InMemoryDirectory::new();
        let stats = StatsCollector::new();
        stats.pending();
        let chunk = DataChunk::new(vec![
            Sample::new(10, 1.0),
            Sample::new(9, 2.0),
            Sample::new(11, f64::NAN),
            Sample::new(12, 3.0),
        ]);

        run_write(&directory, &stats, &name("a"), chunk, Instant::now(), true, true)
            .await
            .unwrap();

        let metric = directory.metric(&name("a")).await.unwrap();
        let stored = metric.retrieve_raw(i64::MIN, i64::MAX).await.unwrap();
        assert_eq!(stored, vec![Sample::new(10, 1.0), Sample::new(12, 3.0)]);
    }

    #[tokio::test]
    async fn successful_write_records_a_completion_not_a_failure() {
        let directory = InMemoryDirectory::new();
        let stats = StatsCollector::new();
        stats.pending();
        run_write(
            &directory,
            &stats,
            &name("a"),
            DataChunk::new(vec![Sample::new(1, 1.0)]),
            Instant::now(),
            true,
            true,
        )
        .await
        .unwrap();

        let snap = stats.collect();
        assert_eq!(snap.completed_count, 1);
        assert_eq!(snap.failed_count, 0);
    }
}
