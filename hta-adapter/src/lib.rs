// /////////////////////////////////////////////////////////////////////////////
// HTA Ingestion & Query Adapter
// /////////////////////////////////////////////////////////////////////////////

//! The Async HTA Service: per-metric serialization, input-name mapping, the
//! write/read pipelines, and the statistics collector, wired together by the
//! [`HtaService`] façade.
//!
//! Built on [`hta_adapter_domain`] for its pure types and services; this
//! crate adds the tokio runtime, the Prometheus self-instrumentation,
//! configuration loading, and the in-memory store used for tests and the
//! demo binary.

pub mod application;
pub mod infrastructure;

pub use application::services::{HtaService, Subscription};
pub use infrastructure::adapters::InMemoryDirectory;
pub use infrastructure::config::{ConfigService, ObservabilityConfig, ServiceConfig};
pub use infrastructure::metrics::{run_stats_loop, Direction, SelfMetrics, StatsMetrics, TelemetryPoint};
pub use infrastructure::runtime::StrandTable;
