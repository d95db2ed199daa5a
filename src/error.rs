//! Error types for the log sink.
//!
//! Internal modules return typed errors built with [`thiserror`]. The write
//! path never surfaces them to callers: failures are recorded on the
//! [`LogFile`](crate::LogFile) and exposed through its introspection queries.
//! The CLI converts them to [`anyhow::Error`] at its boundary.
//!
//! # Error hierarchy
//!
//! ```text
//! LogSinkError
//! ├── LogFile(LogFileError): path resolution, open, rotate, write
//! └── Config(ConfigError):  TOML loading and validation
//! ```

use std::io;
use std::path::PathBuf;
use std::sync::Arc;

use thiserror::Error;

/// Top-level error type for the log sink.
#[derive(Error, Debug)]
pub enum LogSinkError {
    /// Log file lifecycle error.
    #[error("Log file error: {0}")]
    LogFile(#[from] LogFileError),

    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
}

/// Errors raised by the log file lifecycle.
///
/// Cheap to clone so the most recent failure can be kept on the sink and
/// handed out by [`LogFile::last_error`](crate::LogFile::last_error).
#[derive(Error, Debug, Clone)]
pub enum LogFileError {
    /// No usable log file path could be derived from configuration or
    /// application metadata.
    #[error("No log file path available: {reason}")]
    PathUnavailable {
        /// Which step of the default-path chain gave up.
        reason: &'static str,
    },

    /// The filesystem refused to open or create the primary log file.
    #[error("Failed to open log file {}: {source}", path.display())]
    OpenFailure {
        /// Primary log file path.
        path: PathBuf,
        /// Underlying I/O error.
        source: Arc<io::Error>,
    },

    /// The primary log file could not be moved to the backup path.
    #[error("Failed to rotate log file {} to {}: {source}", path.display(), backup.display())]
    RotateFailure {
        /// Primary log file path.
        path: PathBuf,
        /// Backup log file path.
        backup: PathBuf,
        /// Underlying I/O error.
        source: Arc<io::Error>,
    },

    /// Writing to an open log file failed.
    #[error("Failed to write log file {}: {source}", path.display())]
    WriteFailure {
        /// Primary log file path.
        path: PathBuf,
        /// Underlying I/O error.
        source: Arc<io::Error>,
    },
}

impl LogFileError {
    /// Short kind name, used in diagnostics and `info` output.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::PathUnavailable { .. } => "path-unavailable",
            Self::OpenFailure { .. } => "open-failure",
            Self::RotateFailure { .. } => "rotate-failure",
            Self::WriteFailure { .. } => "write-failure",
        }
    }
}

/// Errors that arise from loading and validating configuration.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// The configuration file exists but could not be read.
    #[error("IO error reading config file {}: {source}", path.display())]
    Read {
        /// Path to the file that could not be read.
        path: PathBuf,
        /// Underlying I/O error.
        source: io::Error,
    },

    /// The configuration file is not valid TOML for [`Config`](crate::Config).
    #[error("Invalid config in {origin}: {source}")]
    Parse {
        /// File path or `<string>` for in-memory sources.
        origin: String,
        /// Underlying TOML error.
        source: toml::de::Error,
    },

    /// A value parsed but is not acceptable.
    #[error("Invalid config value for '{key}': {message}")]
    Invalid {
        /// Offending key.
        key: &'static str,
        /// Human-readable reason.
        message: String,
    },
}
