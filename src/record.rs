//! Log records and severity levels.
use std::fmt;

use chrono::{DateTime, Local};

/// Severity of a log record. Lower values are more severe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Level {
    /// Unrecoverable condition.
    Critical = 1,
    /// Operation failed.
    Error = 2,
    /// Something unexpected that was handled.
    Warning = 3,
    /// Normal operational message.
    Info = 4,
    /// Developer detail.
    Debug = 5,
    /// Fine-grained tracing.
    Trace = 6,
}

impl Level {
    /// One-letter tag written to the log file.
    #[must_use]
    pub const fn tag(self) -> &'static str {
        match self {
            Self::Critical => "C",
            Self::Error => "E",
            Self::Warning => "W",
            Self::Info => "I",
            Self::Debug => "D",
            Self::Trace => "T",
        }
    }

    /// Level for a numeric code (1 = critical … 6 = trace).
    #[must_use]
    pub const fn from_code(code: u32) -> Option<Self> {
        match code {
            1 => Some(Self::Critical),
            2 => Some(Self::Error),
            3 => Some(Self::Warning),
            4 => Some(Self::Info),
            5 => Some(Self::Debug),
            6 => Some(Self::Trace),
            _ => None,
        }
    }

    /// Numeric code of this level.
    #[must_use]
    pub const fn code(self) -> u32 {
        self as u32
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Critical => "critical",
            Self::Error => "error",
            Self::Warning => "warning",
            Self::Info => "info",
            Self::Debug => "debug",
            Self::Trace => "trace",
        };
        f.write_str(name)
    }
}

impl std::str::FromStr for Level {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "critical" | "c" => Ok(Self::Critical),
            "error" | "e" => Ok(Self::Error),
            "warning" | "warn" | "w" => Ok(Self::Warning),
            "info" | "i" => Ok(Self::Info),
            "debug" | "d" => Ok(Self::Debug),
            "trace" | "t" => Ok(Self::Trace),
            other => Err(format!("unknown level '{other}'")),
        }
    }
}

impl From<tracing::Level> for Level {
    fn from(level: tracing::Level) -> Self {
        match level {
            tracing::Level::ERROR => Self::Error,
            tracing::Level::WARN => Self::Warning,
            tracing::Level::INFO => Self::Info,
            tracing::Level::DEBUG => Self::Debug,
            tracing::Level::TRACE => Self::Trace,
        }
    }
}

/// Where a log call was made. Every part is optional.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CallSite<'a> {
    /// Source file path.
    pub file: Option<&'a str>,
    /// Source line number.
    pub line: Option<u32>,
    /// Function or module path.
    pub function: Option<&'a str>,
}

impl<'a> CallSite<'a> {
    /// Call site with all three parts known.
    #[must_use]
    pub const fn new(file: &'a str, line: u32, function: &'a str) -> Self {
        Self {
            file: Some(file),
            line: Some(line),
            function: Some(function),
        }
    }
}

/// A single log write request.
///
/// The timestamp, process id and thread id are captured by [`LogRecord::new`],
/// so formatting the record later is a pure function of its fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogRecord {
    /// Component token, e.g. a subsystem name.
    pub component: String,
    /// Severity.
    pub level: Level,
    /// Source file of the call site.
    pub file: Option<String>,
    /// Source line of the call site.
    pub line: Option<u32>,
    /// Function or module path of the call site.
    pub function: Option<String>,
    /// Fully interpolated message body.
    pub message: String,
    /// Wall-clock time the record was created.
    pub timestamp: DateTime<Local>,
    /// Process id.
    pub process_id: u32,
    /// Thread name, or the thread id when unnamed.
    pub thread: String,
}

impl LogRecord {
    /// Create a record stamped with the current time, process and thread.
    #[must_use]
    pub fn new(component: impl Into<String>, level: Level, message: impl Into<String>) -> Self {
        Self {
            component: component.into(),
            level,
            file: None,
            line: None,
            function: None,
            message: message.into(),
            timestamp: Local::now(),
            process_id: std::process::id(),
            thread: current_thread_label(),
        }
    }

    /// Attach the call site's file, line and function.
    #[must_use]
    pub fn located(mut self, site: CallSite<'_>) -> Self {
        self.file = site.file.map(str::to_string);
        self.line = site.line;
        self.function = site.function.map(str::to_string);
        self
    }
}

/// Thread name, or the numeric part of the thread id when unnamed.
fn current_thread_label() -> String {
    let thread = std::thread::current();
    if let Some(name) = thread.name() {
        return name.to_string();
    }
    let id = format!("{:?}", thread.id());
    id.trim_start_matches("ThreadId(")
        .trim_end_matches(')')
        .to_string()
}
