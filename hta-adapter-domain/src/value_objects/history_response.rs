// /////////////////////////////////////////////////////////////////////////////
// HTA Ingestion & Query Adapter
// /////////////////////////////////////////////////////////////////////////////

use crate::value_objects::aggregate::Aggregate;
use crate::value_objects::metric_name::MetricName;

/// The materialized response to a [`crate::value_objects::history_request::HistoryRequest`].
///
/// `time_delta[i]` is the nanosecond gap from the previous emitted point
/// (from zero for the first); callers reconstruct absolute timestamps by
/// prefix-summing `time_delta`. Exactly one of `value`/`aggregate` is
/// populated per emitted point depending on which arm of the read pipeline
/// produced it, but the two vectors are kept separate (rather than a single
/// `Vec<enum>`) to match the wire shape described in the spec: `time_delta`,
/// `value`, and `aggregate` are three independently-repeated fields.
#[derive(Debug, Clone, Default, serde::Serialize, serde::Deserialize)]
pub struct HistoryResponse {
    pub metric: String,
    pub time_delta: Vec<i64>,
    pub value: Vec<f64>,
    pub aggregate: Vec<Aggregate>,
}

impl HistoryResponse {
    pub fn empty(metric: &MetricName) -> Self {
        Self {
            metric: metric.as_str().to_string(),
            time_delta: Vec::new(),
            value: Vec::new(),
            aggregate: Vec::new(),
        }
    }

    pub fn push_aggregate(&mut self, time_delta: i64, aggregate: Aggregate) {
        self.time_delta.push(time_delta);
        self.aggregate.push(aggregate);
    }

    pub fn push_value(&mut self, time_delta: i64, value: f64) {
        self.time_delta.push(time_delta);
        self.value.push(value);
    }

    /// Rough in-memory size of the materialized rows, used only for
    /// throughput estimation in the stats collector — not part of the wire
    /// contract.
    pub fn data_size_bytes(&self) -> usize {
        self.time_delta.len() * std::mem::size_of::<i64>()
            + self.value.len() * std::mem::size_of::<f64>()
            + self.aggregate.len() * std::mem::size_of::<Aggregate>()
    }
}
