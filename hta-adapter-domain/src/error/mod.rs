// /////////////////////////////////////////////////////////////////////////////
// HTA Ingestion & Query Adapter
// /////////////////////////////////////////////////////////////////////////////

//! Domain error types for the HTA adapter.
//!
//! All fallible domain operations resolve to [`HtaError`]. The variants
//! mirror the error taxonomy the service is specified against: configuration
//! mistakes, mapping ambiguity, store failures, and data anomalies.

mod hta_error;

pub use hta_error::HtaError;
