// /////////////////////////////////////////////////////////////////////////////
// HTA Ingestion & Query Adapter
// /////////////////////////////////////////////////////////////////////////////

use std::fmt;

use crate::error::HtaError;

/// The canonical identifier a metric is stored under in the HTA directory.
///
/// Distinct from [`InputName`] at the type level so the write path can't
/// accidentally address the store with an unresolved producer-facing name.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, serde::Serialize, serde::Deserialize)]
#[serde(transparent)]
pub struct MetricName(String);

impl MetricName {
    pub fn new(name: impl Into<String>) -> Result<Self, HtaError> {
        let name = name.into();
        if name.is_empty() {
            return Err(HtaError::validation("metric name must not be empty"));
        }
        Ok(Self(name))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Display for MetricName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for MetricName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// The name a producer addresses a write/read request with, before
/// [`crate::services::mapping_table::MappingTable`] resolves it to a
/// [`MetricName`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, serde::Serialize, serde::Deserialize)]
#[serde(transparent)]
pub struct InputName(String);

impl InputName {
    pub fn new(name: impl Into<String>) -> Result<Self, HtaError> {
        let name = name.into();
        if name.is_empty() {
            return Err(HtaError::validation("input name must not be empty"));
        }
        Ok(Self(name))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }

    /// Turns this input name into a [`MetricName`] with the same text,
    /// used for the identity-mapping auto-registration path in
    /// [`crate::services::mapping_table::MappingTable::resolve`].
    pub fn to_metric_name(&self) -> MetricName {
        MetricName(self.0.clone())
    }
}

impl fmt::Display for InputName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for InputName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
