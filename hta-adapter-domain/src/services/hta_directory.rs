// /////////////////////////////////////////////////////////////////////////////
// HTA Ingestion & Query Adapter
// /////////////////////////////////////////////////////////////////////////////

//! Ports onto the HTA store.
//!
//! The store itself — its on-disk format, its aggregation levels, its
//! persistence guarantees — is an external collaborator named only by this
//! interface (see spec.md §1). `hta-adapter` provides the real adapter and
//! an in-memory stand-in used by tests and the demo binary.

use async_trait::async_trait;

use crate::entities::metric_config::MetricConfig;
use crate::error::HtaError;
use crate::value_objects::aggregate::Aggregate;
use crate::value_objects::metric_name::MetricName;
use crate::value_objects::sample::Sample;
use crate::value_objects::time_range::TimeRange;

/// One row of an aggregate timeline, as returned by
/// [`HtaMetric::retrieve`]/[`HtaMetric::retrieve_flex`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AggregateRow {
    pub time: i64,
    pub aggregate: Aggregate,
}

/// The result of a flex-timeline retrieval: the store decides per-call
/// whether to hand back pre-aggregated rows or raw samples (spec.md §9,
/// "Open question — FLEX_TIMELINE tie-breaking"). Callers must handle
/// either shape.
#[derive(Debug, Clone)]
pub enum FlexRows {
    Aggregated(Vec<AggregateRow>),
    Raw(Vec<Sample>),
}

/// A single named metric handle. Not `Sync`-safe to call concurrently —
/// the strand discipline in `hta-adapter` guarantees at most one in-flight
/// call per handle at any instant; this trait makes no such guarantee on
/// its own.
#[async_trait]
pub trait HtaMetric: Send + Sync {
    /// The current `(min_time, max_time)` span of stored samples.
    async fn range(&self) -> Result<TimeRange, HtaError>;

    /// Inserts one sample. Callers are responsible for monotonic-time and
    /// finite-value enforcement before calling this — the store itself does
    /// not re-check either invariant.
    async fn insert(&self, sample: Sample) -> Result<(), HtaError>;

    /// Forces any buffered inserts to durable storage.
    async fn flush(&self) -> Result<(), HtaError>;

    /// Aggregate rows over `[start, end]`, bucketed to at most
    /// `interval_max` wide.
    async fn retrieve(&self, start: i64, end: i64, interval_max: i64) -> Result<Vec<AggregateRow>, HtaError>;

    /// Like `retrieve`, but the store may instead hand back raw samples
    /// when it judges the requested range thin enough.
    async fn retrieve_flex(&self, start: i64, end: i64, interval_max: i64) -> Result<FlexRows, HtaError>;

    /// A single aggregate over `[start, end]`.
    async fn aggregate(&self, start: i64, end: i64) -> Result<Aggregate, HtaError>;

    /// Raw samples in `[start, end]`, inclusive of both endpoints (used by
    /// the last-value query with `start == end == i64::MAX`).
    async fn retrieve_raw(&self, start: i64, end: i64) -> Result<Vec<Sample>, HtaError>;

    /// Number of stored samples, used only by diagnostics/tests.
    async fn count(&self) -> Result<u64, HtaError>;
}

/// The top-level HTA handle: a registry of named metric handles.
#[async_trait]
pub trait HtaDirectory: Send + Sync {
    /// Looks up (creating if necessary, per `cfg`) the handle for `name`.
    async fn metric(&self, name: &MetricName) -> Result<std::sync::Arc<dyn HtaMetric>, HtaError>;

    /// Registers a new metric's configuration without requiring it to
    /// already exist — used by `Reconfigure` (spec.md §4.7) to add metrics
    /// to a running directory.
    async fn emplace(&self, name: &MetricName, cfg: &MetricConfig) -> Result<(), HtaError>;
}
