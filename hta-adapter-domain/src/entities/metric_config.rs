// /////////////////////////////////////////////////////////////////////////////
// HTA Ingestion & Query Adapter
// /////////////////////////////////////////////////////////////////////////////

use serde_json::Value;

/// Per-metric configuration as it arrives in the `metrics` section of the
/// service configuration object.
///
/// The service only inspects `input` (aliasing) and `prefix` (rejected when
/// set); everything else is opaque and forwarded to the HTA store as-is.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct MetricConfig {
    /// Alias for the inbound name; defaults to the config key it was found
    /// under.
    #[serde(default)]
    pub input: Option<String>,

    /// If `true`, this metric's configuration is rejected — prefix-based
    /// configuration is unsupported by this service.
    #[serde(default)]
    pub prefix: Option<bool>,

    /// Every other field, forwarded opaquely to the HTA store.
    #[serde(flatten)]
    pub extra: Value,
}

impl MetricConfig {
    pub fn is_prefix(&self) -> bool {
        self.prefix.unwrap_or(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deserializes_opaque_fields_into_extra() {
        let json = serde_json::json!({ "input": "a.raw", "retention": "30d" });
        let cfg: MetricConfig = serde_json::from_value(json).unwrap();
        assert_eq!(cfg.input.as_deref(), Some("a.raw"));
        assert!(!cfg.is_prefix());
        assert_eq!(cfg.extra.get("retention").and_then(|v| v.as_str()), Some("30d"));
    }
}
