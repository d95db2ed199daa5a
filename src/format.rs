//! Rendering of [`LogRecord`]s into log file lines.
//!
//! Each record becomes exactly one `\n`-terminated line:
//!
//! ```text
//! 2026-10-16 09:30:05.000250 4242:main I net [conn.rs:42] accept: peer connected
//! ```
//!
//! The `[file:line]` block and the `function:` prefix are controlled by the
//! `show-*` options. When escaping is enabled, control characters inside the
//! message are replaced by printable escape sequences so the line stays
//! single-line.
use std::fmt::Write as _;

use crate::config::Config;
use crate::record::LogRecord;

/// Timestamp layout, microsecond precision in local time.
const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.6f";

/// Pure record-to-text renderer configured once from [`Config`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[allow(clippy::struct_excessive_bools)]
pub struct Formatter {
    /// Escape control characters in the message body.
    pub escape_special_characters: bool,
    /// Include the source file name.
    pub show_file_names: bool,
    /// Include the source line number.
    pub show_line_numbers: bool,
    /// Include the function name.
    pub show_function_names: bool,
}

impl Formatter {
    /// Build a formatter from the `show-*` and escape options.
    #[must_use]
    pub const fn from_config(config: &Config) -> Self {
        Self {
            escape_special_characters: config.escape_special_characters,
            show_file_names: config.show_file_names,
            show_line_numbers: config.show_line_numbers,
            show_function_names: config.show_function_names,
        }
    }

    /// Render `record` as a single line terminated by `\n`.
    #[must_use]
    pub fn format(&self, record: &LogRecord) -> String {
        let mut line = String::with_capacity(64 + record.message.len());
        // Writing to a String cannot fail.
        let _ = write!(
            line,
            "{} {}:{} {} {}",
            record.timestamp.format(TIMESTAMP_FORMAT),
            record.process_id,
            record.thread,
            record.level.tag(),
            record.component,
        );
        if let Some(location) = self.location(record) {
            line.push(' ');
            line.push_str(&location);
        }
        if self.show_function_names
            && let Some(function) = record.function.as_deref().filter(|f| !f.is_empty())
        {
            line.push(' ');
            line.push_str(function);
            line.push(':');
        }
        line.push(' ');
        if self.escape_special_characters {
            line.push_str(&escape_special_characters(&record.message));
        } else {
            line.push_str(&record.message);
        }
        line.push('\n');
        line
    }

    /// The `[file:line]` block, or `None` when nothing is shown.
    fn location(&self, record: &LogRecord) -> Option<String> {
        let file = record
            .file
            .as_deref()
            .filter(|_| self.show_file_names)
            .map(file_name)
            .filter(|f| !f.is_empty());
        let line = record.line.filter(|_| self.show_line_numbers);
        match (file, line) {
            (Some(file), Some(line)) => Some(format!("[{file}:{line}]")),
            (Some(file), None) => Some(format!("[{file}]")),
            (None, Some(line)) => Some(format!("[:{line}]")),
            (None, None) => None,
        }
    }
}

/// Last component of a `/`- or `\`-separated source path.
fn file_name(path: &str) -> &str {
    path.rsplit(['/', '\\']).next().unwrap_or(path)
}

/// Escape control characters so `s` renders on a single line.
///
/// The mapping is reversible: `\` becomes `\\`, newline, carriage return and
/// tab become `\n`, `\r`, `\t`, and every other control character becomes
/// `\u{XXXX}`.
#[must_use]
pub fn escape_special_characters(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            c if c.is_control() || matches!(c, '\u{2028}' | '\u{2029}') => {
                let _ = write!(out, "\\u{{{:04X}}}", u32::from(c));
            }
            c => out.push(c),
        }
    }
    out
}
