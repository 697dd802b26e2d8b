// /////////////////////////////////////////////////////////////////////////////
// HTA Ingestion & Query Adapter
// /////////////////////////////////////////////////////////////////////////////

//! The read pipeline: dispatch over the four `HistoryRequest` shapes and
//! response materialization, all running under a metric's strand
//! (spec.md §4.4).

use std::time::Instant;

use hta_adapter_domain::error::HtaError;
use hta_adapter_domain::services::{FlexRows, HtaDirectory, StatsCollector, StatsTransaction};
use hta_adapter_domain::value_objects::{HistoryRequest, HistoryRequestKind, HistoryResponse, MetricName};
use tracing::warn;

/// Runs one read under `name`'s strand. On success the stats transaction
/// records a completion; on an `HtaError` from the store it records a
/// failure and the error is returned for the strand boundary to route to
/// the caller's `failed` callback (spec.md §7).
///
/// An `UnknownRequestType` is not an error here — the request is warned
/// about and an empty response is returned, exactly as spec.md §7's error
/// table describes ("producer bug, not a retryable condition").
pub async fn run_read(
    directory: &dyn HtaDirectory,
    stats: &StatsCollector,
    name: &MetricName,
    request: &HistoryRequest,
    pending_since: Instant,
) -> Result<HistoryResponse, HtaError> {
    let tx = StatsTransaction::begin(stats, pending_since);
    match run_read_inner(directory, name, request).await {
        Ok(response) => {
            tx.complete(response.data_size_bytes() as u64);
            Ok(response)
        }
        Err(err) => Err(err),
    }
}

async fn run_read_inner(
    directory: &dyn HtaDirectory,
    name: &MetricName,
    request: &HistoryRequest,
) -> Result<HistoryResponse, HtaError> {
    let mut response = HistoryResponse::empty(name);
    let metric = directory.metric(name).await?;

    match request.kind {
        HistoryRequestKind::AggregateTimeline => {
            let rows = metric
                .retrieve(request.start_time_ns, request.end_time_ns, request.interval_max_ns)
                .await?;
            let mut previous = 0i64;
            for row in rows {
                response.push_aggregate(row.time - previous, row.aggregate);
                previous = row.time;
            }
        }
        HistoryRequestKind::FlexTimeline => {
            let flex = metric
                .retrieve_flex(request.start_time_ns, request.end_time_ns, request.interval_max_ns)
                .await?;
            match flex {
                FlexRows::Aggregated(rows) => {
                    let mut previous = 0i64;
                    for row in rows {
                        response.push_aggregate(row.time - previous, row.aggregate);
                        previous = row.time;
                    }
                }
                FlexRows::Raw(samples) => {
                    let mut previous = 0i64;
                    for sample in samples {
                        response.push_value(sample.time - previous, sample.value);
                        previous = sample.time;
                    }
                }
            }
        }
        HistoryRequestKind::Aggregate => {
            let aggregate = metric.aggregate(request.start_time_ns, request.end_time_ns).await?;
            response.push_aggregate(request.start_time_ns, aggregate);
        }
        HistoryRequestKind::LastValue => {
            let samples = metric.retrieve_raw(i64::MAX, i64::MAX).await?;
            match samples.len() {
                0 => {}
                1 => response.push_value(samples[0].time, samples[0].value),
                _ => warn!(
                    metric = %name,
                    count = samples.len(),
                    "LAST_VALUE query returned more than one sample; emitting nothing"
                ),
            }
        }
        HistoryRequestKind::Unknown => {
            warn!(metric = %name, "unrecognized history request type");
        }
    }

    Ok(response)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::adapters::InMemoryDirectory;
    use hta_adapter_domain::value_objects::Sample;

    fn name(s: &str) -> MetricName {
        MetricName::new(s).unwrap()
    }

    async fn seeded_directory() -> InMemoryDirectory {
        let directory = InMemoryDirectory::new();
        let metric = directory.metric(&name("a")).await.unwrap();
        metric.insert(Sample::new(10, 1.0)).await.unwrap();
        metric.insert(Sample::new(12, 3.0)).await.unwrap();
        directory
    }

    #[tokio::test]
    async fn aggregate_request_reports_a_single_window() {
        let directory = seeded_directory().await;
        let stats = StatsCollector::new();
        stats.pending();
        let request = HistoryRequest::new(HistoryRequestKind::Aggregate, 0, i64::MAX, 1);
        let response = run_read(&directory, &stats, &name("a"), &request, Instant::now())
            .await
            .unwrap();

        assert_eq!(response.aggregate.len(), 1);
        assert_eq!(response.aggregate[0].count, 2);
        assert_eq!(response.aggregate[0].minimum, 1.0);
        assert_eq!(response.aggregate[0].maximum, 3.0);
        assert_eq!(response.time_delta, vec![0]);
    }

    #[tokio::test]
    async fn last_value_with_one_sample_emits_it() {
        let directory = InMemoryDirectory::new();
        let metric = directory.metric(&name("a")).await.unwrap();
        metric.insert(Sample::new(5, 9.0)).await.unwrap();
        let stats = StatsCollector::new();
        stats.pending();
        let request = HistoryRequest::new(HistoryRequestKind::LastValue, 0, 0, 1);
        let response = run_read(&directory, &stats, &name("a"), &request, Instant::now())
            .await
            .unwrap();

        assert_eq!(response.value, vec![9.0]);
        assert_eq!(response.time_delta, vec![5]);
    }

    #[tokio::test]
    async fn last_value_with_multiple_samples_emits_nothing() {
        let directory = seeded_directory().await;
        let stats = StatsCollector::new();
        stats.pending();
        let request = HistoryRequest::new(HistoryRequestKind::LastValue, 0, 0, 1);
        let response = run_read(&directory, &stats, &name("a"), &request, Instant::now())
            .await
            .unwrap();

        assert!(response.value.is_empty());
        assert!(response.aggregate.is_empty());
    }

    #[tokio::test]
    async fn unknown_request_kind_yields_an_empty_response_not_an_error() {
        let directory = seeded_directory().await;
        let stats = StatsCollector::new();
        stats.pending();
        let request = HistoryRequest::new(HistoryRequestKind::Unknown, 0, 0, 1);
        let response = run_read(&directory, &stats, &name("a"), &request, Instant::now())
            .await
            .unwrap();

        assert!(response.value.is_empty());
        assert!(response.aggregate.is_empty());
    }
}
