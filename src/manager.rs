//! The log file lifecycle: lazy open, append, size-based rotation, reset.
//!
//! [`LogFile`] owns the only handle to the primary log file. Every operation
//! runs under a single mutex, so one record's format, append, rotate-check
//! and mirror sequence is never interleaved with another's.
//!
//! Failures on the write path are absorbed: the record is dropped for the
//! file (the console mirror still fires), the error is kept as
//! [`LogFile::last_error`], and the next write retries the open.
use std::fmt::{self, Display};
use std::fs::{self, File, OpenOptions};
use std::io::{self, Write as _};
use std::path::Path;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use crate::config::Config;
use crate::error::{LogFileError, LogSinkError};
use crate::format::Formatter;
use crate::mirror::ConsoleMirror;
use crate::paths::LogPaths;
use crate::record::{CallSite, Level, LogRecord};
use crate::template;

/// Lifecycle state of the primary log file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileState {
    /// Not opened yet, or the last open/write failed.
    Unopened,
    /// A handle is open and accepting writes.
    Open,
    /// Explicitly closed; the next write reopens in append mode.
    Closed,
}

impl Display for FileState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Unopened => "unopened",
            Self::Open => "open",
            Self::Closed => "closed",
        })
    }
}

/// How the primary file is opened.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum OpenMode {
    /// Keep existing contents; size starts at the current file length.
    Append,
    /// Discard existing contents; size starts at zero.
    Truncate,
}

/// The open primary file and the bytes written to it since it was opened.
#[derive(Debug)]
struct Handle {
    file: File,
    size: u64,
}

/// Mutable state guarded by the [`LogFile`] lock.
#[derive(Debug)]
struct Inner {
    state: FileState,
    handle: Option<Handle>,
    /// Set after the first successful open; later opens always append.
    opened_once: bool,
    mirror: ConsoleMirror,
    last_error: Option<LogFileError>,
    dropped: u64,
}

/// Process-local log file sink with single-generation size-based rotation.
///
/// Construct one per process and share it (typically as `Arc<LogFile>`).
/// The file is opened lazily by the first write.
#[derive(Debug)]
pub struct LogFile {
    config: Config,
    formatter: Formatter,
    paths: Option<LogPaths>,
    path_error: Option<LogFileError>,
    inner: Mutex<Inner>,
}

impl LogFile {
    /// Create a sink for `config`, mirroring to stderr if configured.
    ///
    /// Paths are resolved here. If resolution fails the sink still works,
    /// but every file write is dropped and [`last_error`](Self::last_error)
    /// reports [`LogFileError::PathUnavailable`].
    #[must_use]
    pub fn new(config: Config) -> Self {
        let mirror = ConsoleMirror::stderr(config.mirror_to_stderr);
        Self::with_mirror(config, mirror)
    }

    /// Validate `config` and open the primary file immediately.
    ///
    /// Use this instead of [`new`](Self::new) when an unusable destination
    /// should be reported up front rather than absorbed on the write path.
    ///
    /// # Errors
    ///
    /// Returns [`LogSinkError::Config`] if `config` is invalid, or
    /// [`LogSinkError::LogFile`] if the path cannot be resolved or opened.
    pub fn try_new(config: Config) -> Result<Self, LogSinkError> {
        config.validate()?;
        let sink = Self::new(config);
        sink.open()?;
        Ok(sink)
    }

    /// Create a sink with an explicit console mirror.
    #[must_use]
    pub fn with_mirror(config: Config, mirror: ConsoleMirror) -> Self {
        let formatter = Formatter::from_config(&config);
        let (paths, path_error) = match LogPaths::resolve(&config) {
            Ok(paths) => (Some(paths), None),
            Err(e) => {
                tracing::warn!("log file disabled: {e}");
                (None, Some(e))
            }
        };
        Self {
            inner: Mutex::new(Inner {
                state: FileState::Unopened,
                handle: None,
                opened_once: false,
                mirror,
                last_error: path_error.clone(),
                dropped: 0,
            }),
            config,
            formatter,
            paths,
            path_error,
        }
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn resolved_paths(&self) -> Result<&LogPaths, LogFileError> {
        self.paths.as_ref().ok_or_else(|| {
            self.path_error
                .clone()
                .unwrap_or(LogFileError::PathUnavailable {
                    reason: "log file path was not resolved",
                })
        })
    }

    // ------------------------------------------------------------------
    // Write entry points
    // ------------------------------------------------------------------

    /// Format and write `record`. Never fails from the caller's view.
    pub fn log(&self, record: &LogRecord) {
        let mut inner = self.lock();
        let text = self.formatter.format(record);
        self.append_locked(&mut inner, &text);
        inner.mirror.mirror(&text);
    }

    /// Interpolate `template` with `args` and write the result.
    ///
    /// A template whose `{}` placeholders do not match `args` is written
    /// literally.
    pub fn log_template(
        &self,
        component: &str,
        level: Level,
        site: CallSite<'_>,
        template: &str,
        args: &[&dyn Display],
    ) {
        let message = template::interpolate(template, args);
        self.log(&LogRecord::new(component, level, message).located(site));
    }

    /// Write a message built from `format_args!`. Used by [`log_to!`](crate::log_to).
    pub fn log_args(
        &self,
        component: &str,
        level: Level,
        site: CallSite<'_>,
        args: fmt::Arguments<'_>,
    ) {
        self.log(&LogRecord::new(component, level, fmt::format(args)).located(site));
    }

    /// Write already formatted `text` as-is.
    pub fn append(&self, text: &str) {
        let mut inner = self.lock();
        self.append_locked(&mut inner, text);
        inner.mirror.mirror(text);
    }

    // ------------------------------------------------------------------
    // Lifecycle
    // ------------------------------------------------------------------

    /// Open the primary file. No-op if already open.
    ///
    /// The first open truncates unless `append-to-existing` is set; reopening
    /// after [`close`](Self::close) always appends.
    ///
    /// # Errors
    ///
    /// Returns [`LogFileError::PathUnavailable`] or
    /// [`LogFileError::OpenFailure`]; the state is left unchanged.
    pub fn open(&self) -> Result<(), LogFileError> {
        let mut inner = self.lock();
        self.ensure_open(&mut inner)
    }

    /// Flush and release the file handle. Idempotent.
    pub fn close(&self) {
        let mut inner = self.lock();
        Self::close_locked(&mut inner);
    }

    /// Start over with an empty primary file and no backup.
    ///
    /// Ignores `append-to-existing`.
    ///
    /// # Errors
    ///
    /// Returns [`LogFileError::PathUnavailable`] or
    /// [`LogFileError::OpenFailure`] if the fresh file cannot be opened.
    pub fn reset(&self) -> Result<(), LogFileError> {
        let mut inner = self.lock();
        let result = self.reset_locked(&mut inner);
        if let Err(e) = &result {
            inner.last_error = Some(e.clone());
        }
        result
    }

    /// Move the primary file to the backup path and start a fresh one.
    ///
    /// # Errors
    ///
    /// Returns [`LogFileError::RotateFailure`] if the rename fails, in which
    /// case writing continues on the existing primary file.
    pub fn rotate(&self) -> Result<(), LogFileError> {
        let mut inner = self.lock();
        let result = self.rotate_locked(&mut inner);
        if let Err(e) = &result {
            inner.last_error = Some(e.clone());
        }
        result
    }

    fn ensure_open(&self, inner: &mut Inner) -> Result<(), LogFileError> {
        if inner.handle.is_some() {
            return Ok(());
        }
        let mode = if inner.opened_once || self.config.append_to_existing {
            OpenMode::Append
        } else {
            OpenMode::Truncate
        };
        let result = self.open_locked(inner, mode);
        if let Err(e) = &result {
            inner.last_error = Some(e.clone());
        }
        result
    }

    fn open_locked(&self, inner: &mut Inner, mode: OpenMode) -> Result<(), LogFileError> {
        let paths = self.resolved_paths()?;
        let handle = open_handle(&paths.primary, mode).map_err(|source| {
            tracing::warn!(path = %paths.primary.display(), "cannot open log file: {source}");
            LogFileError::OpenFailure {
                path: paths.primary.clone(),
                source: Arc::new(source),
            }
        })?;
        tracing::debug!(
            path = %paths.primary.display(),
            size = handle.size,
            append = mode == OpenMode::Append,
            "opened log file"
        );
        inner.handle = Some(handle);
        inner.state = FileState::Open;
        inner.opened_once = true;
        Ok(())
    }

    fn close_locked(inner: &mut Inner) {
        if let Some(handle) = inner.handle.take() {
            handle.file.sync_all().ok();
            tracing::debug!(size = handle.size, "closed log file");
        }
        inner.state = FileState::Closed;
    }

    fn release_handle(inner: &mut Inner) {
        if let Some(handle) = inner.handle.take() {
            handle.file.sync_all().ok();
        }
        inner.state = FileState::Unopened;
    }

    fn reset_locked(&self, inner: &mut Inner) -> Result<(), LogFileError> {
        let paths = self.resolved_paths()?;
        Self::release_handle(inner);
        if let Err(e) = fs::remove_file(&paths.backup)
            && e.kind() != io::ErrorKind::NotFound
        {
            tracing::warn!(path = %paths.backup.display(), "cannot remove backup log file: {e}");
        }
        self.open_locked(inner, OpenMode::Truncate)?;
        tracing::debug!(path = %paths.primary.display(), "reset log file");
        Ok(())
    }

    fn rotate_locked(&self, inner: &mut Inner) -> Result<(), LogFileError> {
        let paths = self.resolved_paths()?;
        Self::release_handle(inner);
        match fs::rename(&paths.primary, &paths.backup) {
            Ok(()) => {}
            Err(e) if e.kind() == io::ErrorKind::NotFound => {}
            Err(source) => {
                tracing::warn!(
                    path = %paths.primary.display(),
                    backup = %paths.backup.display(),
                    "cannot rotate log file: {source}"
                );
                // Keep appending to the oversized file rather than lose records.
                if let Err(e) = self.open_locked(inner, OpenMode::Append) {
                    inner.last_error = Some(e);
                }
                return Err(LogFileError::RotateFailure {
                    path: paths.primary.clone(),
                    backup: paths.backup.clone(),
                    source: Arc::new(source),
                });
            }
        }
        self.open_locked(inner, OpenMode::Truncate)?;
        tracing::debug!(path = %paths.primary.display(), "rotated log file");
        Ok(())
    }

    fn append_locked(&self, inner: &mut Inner, text: &str) {
        if self.ensure_open(inner).is_err() {
            inner.dropped += 1;
            return;
        }
        let Some(handle) = inner.handle.as_mut() else {
            inner.dropped += 1;
            return;
        };
        if let Err(source) = handle.file.write_all(text.as_bytes()) {
            let path = self
                .paths
                .as_ref()
                .map(|p| p.primary.clone())
                .unwrap_or_default();
            tracing::warn!(path = %path.display(), "cannot write log file: {source}");
            inner.last_error = Some(LogFileError::WriteFailure {
                path,
                source: Arc::new(source),
            });
            inner.dropped += 1;
            // The next open re-reads the real size from disk.
            Self::release_handle(inner);
            return;
        }
        handle.size += text.len() as u64;
        if self.config.rotation_enabled()
            && handle.size >= self.config.max_size
            && let Err(e) = self.rotate_locked(inner)
        {
            inner.last_error = Some(e);
        }
    }

    // ------------------------------------------------------------------
    // Introspection
    // ------------------------------------------------------------------

    /// Primary log file path, if one could be resolved.
    #[must_use]
    pub fn path(&self) -> Option<&Path> {
        self.paths.as_ref().map(|p| p.primary.as_path())
    }

    /// Backup log file path, if one could be resolved.
    #[must_use]
    pub fn backup_path(&self) -> Option<&Path> {
        self.paths.as_ref().map(|p| p.backup.as_path())
    }

    /// Bytes written since the primary file was last opened, per the tracked
    /// count rather than a filesystem stat.
    #[must_use]
    pub fn size(&self) -> u64 {
        self.lock().handle.as_ref().map_or(0, |h| h.size)
    }

    /// Rotation threshold in bytes (`0` means rotation is disabled).
    #[must_use]
    pub const fn max_size(&self) -> u64 {
        self.config.max_size
    }

    /// Current lifecycle state.
    #[must_use]
    pub fn state(&self) -> FileState {
        self.lock().state
    }

    /// Most recent failure, if any.
    #[must_use]
    pub fn last_error(&self) -> Option<LogFileError> {
        self.lock().last_error.clone()
    }

    /// Number of records that could not be written to the file.
    #[must_use]
    pub fn dropped_records(&self) -> u64 {
        self.lock().dropped
    }

    /// The configuration this sink was built with.
    #[must_use]
    pub const fn config(&self) -> &Config {
        &self.config
    }

    /// Whether the first open appends to an existing file.
    #[must_use]
    pub const fn appends_to_existing_log_file(&self) -> bool {
        self.config.append_to_existing
    }

    /// Whether formatted lines are mirrored to stderr.
    #[must_use]
    pub const fn mirrors_to_stderr(&self) -> bool {
        self.config.mirror_to_stderr
    }

    /// Whether control characters in messages are escaped.
    #[must_use]
    pub const fn escapes_special_characters(&self) -> bool {
        self.config.escape_special_characters
    }

    /// Whether source file names are written.
    #[must_use]
    pub const fn shows_file_names(&self) -> bool {
        self.config.show_file_names
    }

    /// Whether source line numbers are written.
    #[must_use]
    pub const fn shows_line_numbers(&self) -> bool {
        self.config.show_line_numbers
    }

    /// Whether function names are written.
    #[must_use]
    pub const fn shows_function_names(&self) -> bool {
        self.config.show_function_names
    }
}

impl Drop for LogFile {
    fn drop(&mut self) {
        let inner = self.inner.get_mut().unwrap_or_else(PoisonError::into_inner);
        Self::close_locked(inner);
    }
}

/// Open `path` in `mode`, creating its parent directory if needed.
fn open_handle(path: &Path, mode: OpenMode) -> io::Result<Handle> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent)?;
    }
    let mut options = OpenOptions::new();
    options.create(true);
    match mode {
        OpenMode::Append => options.append(true),
        OpenMode::Truncate => options.write(true).truncate(true),
    };
    let file = options.open(path)?;
    let size = match mode {
        OpenMode::Append => file.metadata()?.len(),
        OpenMode::Truncate => 0,
    };
    Ok(Handle { file, size })
}
