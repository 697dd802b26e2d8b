// /////////////////////////////////////////////////////////////////////////////
// HTA Ingestion & Query Adapter
// /////////////////////////////////////////////////////////////////////////////

pub mod config_service;
pub mod service_config;

pub use config_service::{ConfigService, ObservabilityConfig};
pub use service_config::{LoggingConfig, ServiceConfig, StatsConfig};
