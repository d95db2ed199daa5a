// Shared helpers for integration tests.
//
// Provides a temporary-directory-backed log location and a fluent builder
// so each integration test can create an isolated sink without repeating
// filesystem boilerplate.
//
// Used by all integration test binaries that declare `mod common;`.
#![allow(dead_code)]

use std::path::{Path, PathBuf};
use std::sync::Arc;

use logsink::{Config, LogFile};

/// Read `path` to a string, treating a missing file as empty.
pub fn read_or_empty(path: &Path) -> String {
    match std::fs::read_to_string(path) {
        Ok(s) => s,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => String::new(),
        Err(e) => panic!("read {}: {e}", path.display()),
    }
}

/// Strip the timestamp, process and thread prefix from a formatted line,
/// leaving `<tag> <component> ...`.
pub fn strip_prefix(line: &str) -> &str {
    line.splitn(4, ' ').nth(3).unwrap_or(line)
}

/// An isolated log directory backed by a [`tempfile::TempDir`].
///
/// The directory is automatically deleted when dropped.
pub struct IntegrationTestContext {
    /// Temporary directory holding the log files.
    pub root: tempfile::TempDir,
}

impl IntegrationTestContext {
    /// Create a new, empty context.
    pub fn new() -> Self {
        let root = tempfile::tempdir().expect("create temp dir");
        Self { root }
    }

    /// Path to the temporary directory.
    pub fn root_path(&self) -> &Path {
        self.root.path()
    }

    /// Path of the primary log file used by [`sink`](Self::sink).
    pub fn log_path(&self) -> PathBuf {
        self.root.path().join("app").join("app.log")
    }

    /// Path of the backup log file.
    pub fn backup_path(&self) -> PathBuf {
        self.root.path().join("app").join("app.log.0")
    }

    /// Configuration writing to [`log_path`](Self::log_path) with call-site
    /// decoration turned off.
    pub fn config(&self) -> Config {
        Config {
            show_file_names: false,
            show_line_numbers: false,
            show_function_names: false,
            ..Config::with_path(self.log_path())
        }
    }

    /// Build a shared sink from [`config`](Self::config).
    pub fn sink(&self) -> Arc<LogFile> {
        Arc::new(LogFile::new(self.config()))
    }

    /// Contents of the primary file.
    pub fn primary(&self) -> String {
        read_or_empty(&self.log_path())
    }

    /// Contents of the backup file.
    pub fn backup(&self) -> String {
        read_or_empty(&self.backup_path())
    }
}

/// Fluent builder for a [`LogFile`] inside an [`IntegrationTestContext`].
pub struct SinkBuilder {
    ctx: IntegrationTestContext,
    config: Config,
}

impl SinkBuilder {
    /// Begin building with the context's default config.
    pub fn new() -> Self {
        let ctx = IntegrationTestContext::new();
        let config = ctx.config();
        Self { ctx, config }
    }

    /// Set the rotation threshold.
    pub fn max_size(mut self, max_size: u64) -> Self {
        self.config.max_size = max_size;
        self
    }

    /// Append to an existing file on first open.
    pub fn append_to_existing(mut self) -> Self {
        self.config.append_to_existing = true;
        self
    }

    /// Write `content` to the primary file before the sink is created.
    pub fn with_existing(self, content: &str) -> Self {
        let path = self.ctx.log_path();
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).expect("create log dir");
        }
        std::fs::write(&path, content).expect("write existing log");
        self
    }

    /// Finish building and return the context with its sink.
    pub fn build(self) -> (IntegrationTestContext, Arc<LogFile>) {
        let sink = Arc::new(LogFile::new(self.config));
        (self.ctx, sink)
    }
}
