// /////////////////////////////////////////////////////////////////////////////
// HTA Ingestion & Query Adapter
// /////////////////////////////////////////////////////////////////////////////

//! Bootstrap-phase configuration.
//!
//! `BootstrapConfig` holds the settings resolved from CLI arguments after
//! [`crate::cli::validate_path_argument`] has validated them — it names the
//! two on-disk configuration files ([`hta_adapter::ConfigService`] loads the rest) and
//! the verbosity the logger should start at. Immutable after construction,
//! like the teacher's `AppConfig`: no synchronization needed once built,
//! safe to share across the tasks `app_runner` spawns.

use std::path::PathBuf;

/// Log level configuration, independent of the observability config file's
/// own `logging.level` string so the `--verbose` flag can override it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogLevel {
    /// Error messages only
    Error,
    /// Warnings and errors
    Warn,
    /// Info, warnings, and errors (default)
    #[default]
    Info,
    /// All messages including debug
    Debug,
    /// All messages including trace
    Trace,
}

impl LogLevel {
    /// Parses a level name the way the observability config file names it
    /// (`"error"`, `"warn"`, `"info"`, `"debug"`, `"trace"`), defaulting to
    /// `Info` for anything unrecognized rather than failing startup over a
    /// typo in a non-critical setting.
    pub fn parse(name: &str) -> Self {
        match name.to_lowercase().as_str() {
            "error" => LogLevel::Error,
            "warn" | "warning" => LogLevel::Warn,
            "debug" => LogLevel::Debug,
            "trace" => LogLevel::Trace,
            _ => LogLevel::Info,
        }
    }

    /// Convert to tracing Level
    pub fn to_tracing_level(self) -> tracing::Level {
        match self {
            LogLevel::Error => tracing::Level::ERROR,
            LogLevel::Warn => tracing::Level::WARN,
            LogLevel::Info => tracing::Level::INFO,
            LogLevel::Debug => tracing::Level::DEBUG,
            LogLevel::Trace => tracing::Level::TRACE,
        }
    }
}

/// Validated bootstrap-phase configuration.
#[derive(Debug, Clone)]
pub struct BootstrapConfig {
    /// Path to the service's own configuration object (spec.md §6): threads,
    /// metrics, logging toggles, stats settings.
    service_config_path: PathBuf,

    /// Path to the ambient observability configuration (SPEC_FULL §6): log
    /// level and format. Optional — falls back to defaults if absent.
    observability_config_path: Option<PathBuf>,

    /// Log level floor; `--verbose` forces at least `Debug` regardless of
    /// what the observability config file says.
    log_level: LogLevel,

    /// Enable verbose output (forces `Debug` level).
    verbose: bool,
}

impl BootstrapConfig {
    pub fn builder() -> BootstrapConfigBuilder {
        BootstrapConfigBuilder::default()
    }

    pub fn service_config_path(&self) -> &PathBuf {
        &self.service_config_path
    }

    pub fn observability_config_path(&self) -> Option<&PathBuf> {
        self.observability_config_path.as_ref()
    }

    pub fn log_level(&self) -> LogLevel {
        if self.verbose {
            LogLevel::Debug
        } else {
            self.log_level
        }
    }

    pub fn is_verbose(&self) -> bool {
        self.verbose
    }
}

/// Builder for [`BootstrapConfig`].
#[derive(Debug, Default)]
pub struct BootstrapConfigBuilder {
    service_config_path: Option<PathBuf>,
    observability_config_path: Option<PathBuf>,
    log_level: LogLevel,
    verbose: bool,
}

impl BootstrapConfigBuilder {
    pub fn service_config_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.service_config_path = Some(path.into());
        self
    }

    pub fn observability_config_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.observability_config_path = Some(path.into());
        self
    }

    pub fn log_level(mut self, level: LogLevel) -> Self {
        self.log_level = level;
        self
    }

    pub fn verbose(mut self, enabled: bool) -> Self {
        self.verbose = enabled;
        self
    }

    /// Builds the configuration.
    ///
    /// Returns `Err` rather than panicking if `service_config_path` was
    /// never set — the one field this builder has no sensible default for.
    pub fn try_build(self) -> Result<BootstrapConfig, String> {
        Ok(BootstrapConfig {
            service_config_path: self.service_config_path.ok_or("service_config_path is required")?,
            observability_config_path: self.observability_config_path,
            log_level: self.log_level,
            verbose: self.verbose,
        })
    }
}
