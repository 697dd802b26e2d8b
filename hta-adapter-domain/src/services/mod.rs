// /////////////////////////////////////////////////////////////////////////////
// HTA Ingestion & Query Adapter
// /////////////////////////////////////////////////////////////////////////////

//! Pure-logic domain services: no I/O, no async runtime dependency beyond
//! the `async_trait`-decorated ports onto the external HTA store.

pub mod hta_directory;
pub mod mapping_table;
pub mod stats_collector;

pub use hta_directory::{AggregateRow, FlexRows, HtaDirectory, HtaMetric};
pub use mapping_table::MappingTable;
pub use stats_collector::{StatsCollector, StatsTransaction};
