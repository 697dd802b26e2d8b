// /////////////////////////////////////////////////////////////////////////////
// HTA Ingestion & Query Adapter
// /////////////////////////////////////////////////////////////////////////////

//! Concrete implementations of the `hta-adapter-domain` ports.

pub mod in_memory_directory;

pub use in_memory_directory::InMemoryDirectory;
