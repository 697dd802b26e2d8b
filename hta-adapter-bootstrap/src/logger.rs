// /////////////////////////////////////////////////////////////////////////////
// HTA Ingestion & Query Adapter
// /////////////////////////////////////////////////////////////////////////////

//! Tracing subscriber initialization.
//!
//! The observability config file names a level and a format (`"pretty"` or
//! `"json"`); `--verbose` on the command line overrides the level but never
//! the format. Initialization happens once, at process start, before any
//! other module logs anything.

use hta_adapter::ObservabilityConfig;
use tracing_subscriber::EnvFilter;

use crate::config::LogLevel;

/// Initializes the global tracing subscriber.
///
/// Returns an error if a subscriber has already been installed for this
/// process (`tracing_subscriber::util::TryInitError`), rather than
/// panicking — this can legitimately happen in tests that call init more
/// than once.
pub fn init(observability: &ObservabilityConfig, level: LogLevel) -> Result<(), Box<dyn std::error::Error>> {
    let level = level.to_tracing_level();
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level.to_string()));

    let subscriber = tracing_subscriber::fmt().with_env_filter(filter).with_target(true);

    if observability.logging.format == "json" {
        subscriber.json().try_init()?;
    } else {
        subscriber.try_init()?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn json_format_is_recognized() {
        let config = ObservabilityConfig::default();
        assert_eq!(config.logging.format, "pretty");
    }
}
