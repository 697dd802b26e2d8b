// /////////////////////////////////////////////////////////////////////////////
// HTA Ingestion & Query Adapter
// /////////////////////////////////////////////////////////////////////////////

//! Command-line argument parsing.
//!
//! Scoped to what this process actually needs at startup: where to find the
//! service's configuration object, where to find the ambient observability
//! config, and a verbosity override. Paths are validated before anything
//! downstream touches the filesystem, in the same spirit as the teacher's
//! argument validator, just sized to two path arguments instead of a whole
//! pipeline command surface.

use std::path::{Path, PathBuf};

use clap::Parser;

use crate::exit_code::ExitCode;

const MAX_PATH_LENGTH: usize = 4096;

/// HTA ingestion & query adapter.
#[derive(Debug, Parser)]
#[command(name = "hta-adapter", about = "HTA ingestion & query adapter", version)]
pub struct Cli {
    /// Path to the service configuration file (TOML or JSON).
    #[arg(short = 'c', long = "config", value_name = "PATH")]
    pub config: PathBuf,

    /// Path to the observability configuration file. Falls back to
    /// defaults if omitted or missing.
    #[arg(long = "observability-config", value_name = "PATH")]
    pub observability_config: Option<PathBuf>,

    /// Enable verbose (debug-level) logging.
    #[arg(short = 'v', long)]
    pub verbose: bool,
}

/// Error produced while validating a parsed CLI argument.
#[derive(Debug, thiserror::Error)]
pub enum CliError {
    #[error("path is empty")]
    EmptyPath,
    #[error("path exceeds maximum length of {MAX_PATH_LENGTH} characters")]
    PathTooLong,
    #[error("path contains a null byte")]
    NullByte,
}

impl CliError {
    pub fn exit_code(&self) -> ExitCode {
        ExitCode::UsageError
    }
}

/// Validates a path argument before it is handed to anything that opens a
/// file: rejects empty paths, paths over [`MAX_PATH_LENGTH`], and paths
/// containing a null byte. Existence and readability are left to the
/// caller, which already has a dedicated "file not found" error path.
pub fn validate_path_argument(path: &Path) -> Result<(), CliError> {
    let as_str = path.to_string_lossy();
    if as_str.is_empty() {
        return Err(CliError::EmptyPath);
    }
    if as_str.len() > MAX_PATH_LENGTH {
        return Err(CliError::PathTooLong);
    }
    if as_str.contains('\0') {
        return Err(CliError::NullByte);
    }
    Ok(())
}

impl Cli {
    /// Parses `std::env::args()` and validates every path argument,
    /// returning a usage error rather than panicking on a malformed path.
    pub fn parse_and_validate() -> Result<Self, CliError> {
        let cli = Self::parse();
        validate_path_argument(&cli.config)?;
        if let Some(path) = &cli.observability_config {
            validate_path_argument(path)?;
        }
        Ok(cli)
    }
}
