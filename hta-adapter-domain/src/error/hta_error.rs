// /////////////////////////////////////////////////////////////////////////////
// HTA Ingestion & Query Adapter
// /////////////////////////////////////////////////////////////////////////////

use thiserror::Error;

/// Domain-specific errors for the HTA ingestion and query adapter.
///
/// Each variant corresponds to one row of the error taxonomy: configuration
/// mistakes fail a `configure` call outright, store failures are surfaced to
/// the caller (fatally logged on the write path, returned as `failed` on the
/// read path), and data anomalies never appear here at all — they are
/// counted and skipped inline, not raised as errors.
#[derive(Error, Debug, Clone)]
pub enum HtaError {
    #[error("invalid configuration: {0}")]
    InvalidConfiguration(String),

    #[error("ambiguous mapping: metric '{name}' is already claimed by another input")]
    AmbiguousMapping { name: String },

    #[error("duplicate input: '{input}' is already registered")]
    DuplicateInput { input: String },

    #[error("store failure: {0}")]
    StoreFailure(String),

    #[error("unknown history request type")]
    UnknownRequestType,

    #[error("validation error: {0}")]
    ValidationError(String),

    #[error("metric not found: {0}")]
    MetricNotFound(String),

    #[error("internal error: {0}")]
    InternalError(String),
}

impl HtaError {
    pub fn invalid_config(msg: impl Into<String>) -> Self {
        Self::InvalidConfiguration(msg.into())
    }

    pub fn store_failure(msg: impl Into<String>) -> Self {
        Self::StoreFailure(msg.into())
    }

    pub fn validation(msg: impl Into<String>) -> Self {
        Self::ValidationError(msg.into())
    }

    pub fn internal(msg: impl Into<String>) -> Self {
        Self::InternalError(msg.into())
    }

    /// Whether a caller might reasonably retry the operation that produced
    /// this error. Configuration and mapping errors are never recoverable;
    /// store failures might be transient.
    pub fn is_recoverable(&self) -> bool {
        matches!(self, HtaError::StoreFailure(_))
    }

    /// Coarse category, used for log correlation and metrics labels.
    pub fn category(&self) -> &'static str {
        match self {
            HtaError::InvalidConfiguration(_) => "configuration",
            HtaError::AmbiguousMapping { .. } => "configuration",
            HtaError::DuplicateInput { .. } => "configuration",
            HtaError::StoreFailure(_) => "store",
            HtaError::UnknownRequestType => "request",
            HtaError::ValidationError(_) => "validation",
            HtaError::MetricNotFound(_) => "store",
            HtaError::InternalError(_) => "internal",
        }
    }
}

impl From<std::io::Error> for HtaError {
    fn from(err: std::io::Error) -> Self {
        HtaError::StoreFailure(err.to_string())
    }
}

impl From<serde_json::Error> for HtaError {
    fn from(err: serde_json::Error) -> Self {
        HtaError::InvalidConfiguration(err.to_string())
    }
}
