// /////////////////////////////////////////////////////////////////////////////
// HTA Ingestion & Query Adapter
// /////////////////////////////////////////////////////////////////////////////

//! The service's own configuration object (spec.md §6), plus the legacy
//! array-shaped `metrics` encoding the original parser also accepted
//! (SPEC_FULL §3).

use std::collections::HashMap;

use hta_adapter_domain::entities::MetricConfig;
use hta_adapter_domain::error::HtaError;
use serde::{Deserialize, Serialize};

/// `logging.*` toggles controlling whether the write pipeline warns on
/// skipped samples (spec.md §6).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_true")]
    pub nan_values: bool,
    #[serde(default = "default_true")]
    pub non_monotonic_values: bool,
}

fn default_true() -> bool {
    true
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            nan_values: true,
            non_monotonic_values: true,
        }
    }
}

/// `stats.*` settings enabling the self-telemetry loop (spec.md §4.6/§6).
/// Absent entirely (`None`) means self-telemetry is disabled.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatsConfig {
    pub prefix: String,
    pub rate: f64,
}

/// One entry of the legacy `metrics` array shape: `{name, input, ...}`
/// flattened, normalized into the object-keyed-by-name shape before the
/// façade ever sees it.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct LegacyMetricEntry {
    name: String,
    #[serde(flatten)]
    config: MetricConfig,
}

/// Accepts either the current object-keyed-by-name shape or the legacy
/// array-of-entries shape the original parser also read (SPEC_FULL §3,
/// grounded in `async_hta_service.hpp`'s `// Legacy, TODO remove` branch).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
enum MetricsShape {
    ByName(HashMap<String, MetricConfig>),
    LegacyArray(Vec<LegacyMetricEntry>),
}

impl MetricsShape {
    fn into_by_name(self) -> HashMap<String, MetricConfig> {
        match self {
            MetricsShape::ByName(map) => map,
            MetricsShape::LegacyArray(entries) => {
                entries.into_iter().map(|entry| (entry.name, entry.config)).collect()
            }
        }
    }
}

/// The recognized options of the service's configuration object (spec.md
/// §6). Unrecognized top-level keys are ignored, not rejected.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceConfig {
    pub threads: usize,
    #[serde(default, deserialize_with = "deserialize_metrics_shape")]
    pub metrics: HashMap<String, MetricConfig>,
    #[serde(default)]
    pub logging: LoggingConfig,
    pub stats: Option<StatsConfig>,
}

fn deserialize_metrics_shape<'de, D>(deserializer: D) -> Result<HashMap<String, MetricConfig>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    Ok(MetricsShape::deserialize(deserializer)?.into_by_name())
}

impl ServiceConfig {
    /// Validates the top-level invariants spec.md §6/§7 require before the
    /// façade acts on this configuration: `threads >= 1` and no metric sets
    /// `prefix: true`.
    pub fn validate(&self) -> Result<(), HtaError> {
        if self.threads == 0 {
            return Err(HtaError::invalid_config("threads must be at least 1"));
        }
        for (name, cfg) in &self.metrics {
            if cfg.is_prefix() {
                return Err(HtaError::invalid_config(format!(
                    "metric '{name}': prefix-based configuration is unsupported"
                )));
            }
        }
        Ok(())
    }
}
