// /////////////////////////////////////////////////////////////////////////////
// HTA Ingestion & Query Adapter
// /////////////////////////////////////////////////////////////////////////////

//! Domain layer of the HTA ingestion & query adapter.
//!
//! This crate holds the pure logic: value objects, entities, the error
//! taxonomy, and the services (`MappingTable`, `StatsCollector`) and ports
//! (`HtaDirectory`, `HtaMetric`) that the rest of the workspace builds on.
//! Nothing here owns a runtime, a socket, or a clock beyond
//! `std::time::Instant`/`Duration` — scheduling, persistence, and process
//! lifecycle all live in `hta-adapter` and `hta-adapter-bootstrap`.
//!
//! # Architecture
//!
//! ```text
//! hta-adapter-bootstrap   (process lifecycle: signals, CLI, logging)
//!         |
//!         v
//!   hta-adapter            (strands, pipelines, config, metrics, façade)
//!         |
//!         v
//! hta-adapter-domain       (this crate: value objects, entities, services)
//! ```

pub mod entities;
pub mod error;
pub mod services;
pub mod value_objects;

pub use error::HtaError;
