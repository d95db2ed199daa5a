//! Process-local log file sink.
//!
//! Writes structured log records to an application-specific file and
//! rotates it when it grows past a configured size, keeping one backup
//! generation next to it (`<path>.0`).
//!
//! The public API is organised in layers:
//!
//! - **[`config`]**: immutable options, loaded from TOML or built in code
//! - **[`paths`]**: primary/backup path resolution with default derivation
//! - **[`format`]** and **[`template`]**: record-to-line rendering
//! - **[`manager`]**: the [`LogFile`] lifecycle (open, append, rotate, reset)
//! - **[`layer`]**: a [`tracing_subscriber::Layer`] feeding a [`LogFile`]
//! - **[`cli`]** and **[`commands`]**: the `logsink` command-line tool
//!
//! ```no_run
//! use std::sync::Arc;
//! use logsink::{Config, Level, LogFile, log_to};
//!
//! let sink = Arc::new(LogFile::new(Config::with_path("/tmp/app/app.log")));
//! log_to!(sink, "net", Level::Info, "listening on {}", 8080);
//! ```
#![deny(clippy::or_fun_call)]
#![deny(clippy::bool_to_int_with_if)]

pub mod cli;
pub mod commands;
pub mod config;
pub mod error;
pub mod format;
pub mod layer;
pub mod manager;
pub mod mirror;
pub mod paths;
pub mod record;
pub mod subscriber;
pub mod template;

pub use config::Config;
pub use error::{ConfigError, LogFileError, LogSinkError};
pub use format::Formatter;
pub use layer::LogFileLayer;
pub use manager::{FileState, LogFile};
pub use mirror::ConsoleMirror;
pub use record::{CallSite, Level, LogRecord};

/// Write a formatted message to a [`LogFile`], capturing the call site.
///
/// ```no_run
/// # use logsink::{Config, Level, LogFile, log_to};
/// let sink = LogFile::new(Config::with_path("/tmp/app.log"));
/// log_to!(sink, "db", Level::Warning, "pool {} exhausted after {}ms", "main", 250);
/// ```
#[macro_export]
macro_rules! log_to {
    ($sink:expr, $component:expr, $level:expr, $($arg:tt)+) => {
        $sink.log_args(
            $component,
            $level,
            $crate::CallSite::new(file!(), line!(), module_path!()),
            format_args!($($arg)+),
        )
    };
}
