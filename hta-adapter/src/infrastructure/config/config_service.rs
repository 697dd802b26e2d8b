// /////////////////////////////////////////////////////////////////////////////
// HTA Ingestion & Query Adapter
// /////////////////////////////////////////////////////////////////////////////

//! Loads the service's configuration objects from disk.
//!
//! Mirrors the teacher's `ConfigService`: missing files fall back to
//! defaults with a warning rather than failing, parse errors are wrapped
//! into the crate's own error type, and TOML is the primary format.

use std::path::Path;

use hta_adapter_domain::error::HtaError;
use serde::{Deserialize, Serialize};
use tokio::fs;
use tracing::{debug, warn};

use super::service_config::ServiceConfig;

/// Ambient logging configuration — log level and output format — outside
/// the spec's Configuration object (SPEC_FULL §6). Consumed by
/// `hta-adapter-bootstrap`'s logger initialization, not by the façade.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ObservabilityConfig {
    pub logging: ObservabilityLoggingSettings,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ObservabilityLoggingSettings {
    pub level: String,
    pub format: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            logging: ObservabilityLoggingSettings {
                level: "info".to_string(),
                format: "pretty".to_string(),
            },
        }
    }
}

/// Loads the two configuration objects this workspace needs from disk.
pub struct ConfigService;

impl ConfigService {
    /// Loads the service's `ServiceConfig` (spec.md §6) from a TOML or JSON
    /// file. There is no sensible default for this object — it names the
    /// metrics the service is responsible for — so a missing or invalid
    /// file is an error, not a silent fallback.
    pub async fn load_service_config<P: AsRef<Path>>(config_path: P) -> Result<ServiceConfig, HtaError> {
        let config_path = config_path.as_ref();
        let content = fs::read_to_string(config_path)
            .await
            .map_err(|e| HtaError::invalid_config(format!("failed to read {config_path:?}: {e}")))?;

        let config: ServiceConfig = if config_path.extension().and_then(|e| e.to_str()) == Some("json") {
            serde_json::from_str(&content)
                .map_err(|e| HtaError::invalid_config(format!("failed to parse {config_path:?}: {e}")))?
        } else {
            toml::from_str(&content)
                .map_err(|e| HtaError::invalid_config(format!("failed to parse {config_path:?}: {e}")))?
        };

        config.validate()?;
        debug!(path = ?config_path, threads = config.threads, metrics = config.metrics.len(), "loaded service config");
        Ok(config)
    }

    /// Loads the ambient observability config, falling back to defaults
    /// with a warning if the file is missing — matching the teacher's
    /// `load_observability_config` fallback behavior exactly.
    pub async fn load_observability_config<P: AsRef<Path>>(config_path: P) -> Result<ObservabilityConfig, HtaError> {
        let config_path = config_path.as_ref();
        if !config_path.exists() {
            warn!(path = ?config_path, "observability config not found, using defaults");
            return Ok(ObservabilityConfig::default());
        }

        let content = fs::read_to_string(config_path)
            .await
            .map_err(|e| HtaError::invalid_config(format!("failed to read {config_path:?}: {e}")))?;
        let config: ObservabilityConfig = toml::from_str(&content)
            .map_err(|e| HtaError::invalid_config(format!("failed to parse {config_path:?}: {e}")))?;
        debug!(path = ?config_path, level = %config.logging.level, "loaded observability config");
        Ok(config)
    }
}
