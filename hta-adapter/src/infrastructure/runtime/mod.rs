// /////////////////////////////////////////////////////////////////////////////
// HTA Ingestion & Query Adapter
// /////////////////////////////////////////////////////////////////////////////

//! Runtime infrastructure: per-metric serialization and supervised task
//! spawning on top of the shared tokio runtime.

pub mod strand_table;
pub mod supervisor;

pub use strand_table::StrandTable;
pub use supervisor::{join_supervised, spawn_supervised, AppResult};
