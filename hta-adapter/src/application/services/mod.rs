// /////////////////////////////////////////////////////////////////////////////
// HTA Ingestion & Query Adapter
// /////////////////////////////////////////////////////////////////////////////

//! Application services: the write/read pipelines and the service façade
//! that wires them to the strand table and mapping table.

pub mod hta_service;
pub mod read_pipeline;
pub mod write_pipeline;

pub use hta_service::{HtaService, Subscription};
pub use read_pipeline::run_read;
pub use write_pipeline::run_write;
