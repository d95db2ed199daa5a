//! Command: report resolved paths, sizes and options.
use anyhow::Result;
use serde::Serialize;
use std::path::{Path, PathBuf};

use crate::manager::LogFile;

/// Snapshot of a [`LogFile`] as printed by `logsink info`.
#[allow(clippy::struct_excessive_bools)]
#[derive(Debug, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct Info {
    /// Primary log file path.
    pub path: Option<PathBuf>,
    /// Backup log file path.
    pub backup: Option<PathBuf>,
    /// Lifecycle state of the sink.
    pub state: String,
    /// On-disk size of the primary file.
    pub size: Option<u64>,
    /// On-disk size of the backup file.
    pub backup_size: Option<u64>,
    /// Rotation threshold (`0` disables rotation).
    pub max_size: u64,
    /// Whether the first open appends.
    pub append_to_existing: bool,
    /// Whether lines are mirrored to stderr.
    pub mirror_to_stderr: bool,
    /// Whether control characters are escaped.
    pub escape_special_characters: bool,
    /// Whether the source file name is shown.
    pub show_file_names: bool,
    /// Whether the source line number is shown.
    pub show_line_numbers: bool,
    /// Whether the function name is shown.
    pub show_function_names: bool,
    /// Last error reported by the sink.
    pub last_error: Option<String>,
}

fn disk_size(path: Option<&Path>) -> Option<u64> {
    path.and_then(|p| std::fs::metadata(p).ok()).map(|m| m.len())
}

impl Info {
    /// Capture the current state of `sink`.
    #[must_use]
    pub fn collect(sink: &LogFile) -> Self {
        Self {
            path: sink.path().map(Path::to_path_buf),
            backup: sink.backup_path().map(Path::to_path_buf),
            state: sink.state().to_string(),
            size: disk_size(sink.path()),
            backup_size: disk_size(sink.backup_path()),
            max_size: sink.max_size(),
            append_to_existing: sink.appends_to_existing_log_file(),
            mirror_to_stderr: sink.mirrors_to_stderr(),
            escape_special_characters: sink.escapes_special_characters(),
            show_file_names: sink.shows_file_names(),
            show_line_numbers: sink.shows_line_numbers(),
            show_function_names: sink.shows_function_names(),
            last_error: sink.last_error().map(|e| e.to_string()),
        }
    }
}

/// Print [`Info`] for `sink` as pretty JSON.
///
/// # Errors
///
/// Returns an error if serialization fails.
#[allow(clippy::print_stdout)]
pub fn run(sink: &LogFile) -> Result<()> {
    let json = serde_json::to_string_pretty(&Info::collect(sink))?;
    println!("{json}");
    Ok(())
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::config::Config;

    #[test]
    fn reports_disk_sizes_and_options() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("app.log");
        std::fs::write(dir.path().join("app.log.0"), "12345").unwrap();
        let sink = LogFile::new(Config {
            max_size: 4096,
            ..Config::with_path(&path)
        });
        sink.append("abc\n");

        let info = Info::collect(&sink);
        assert_eq!(info.path.as_deref(), Some(path.as_path()));
        assert_eq!(info.size, Some(4));
        assert_eq!(info.backup_size, Some(5));
        assert_eq!(info.max_size, 4096);
        assert_eq!(info.state, sink.state().to_string());
        assert!(info.last_error.is_none());

        let json: serde_json::Value =
            serde_json::from_str(&serde_json::to_string(&info).unwrap()).unwrap();
        assert_eq!(json["max-size"], 4096);
        assert_eq!(json["show-file-names"], true);
    }

    #[test]
    fn missing_files_have_no_size() {
        let dir = tempfile::tempdir().unwrap();
        let sink = LogFile::new(Config::with_path(dir.path().join("none.log")));
        let info = Info::collect(&sink);
        assert_eq!(info.size, None);
        assert_eq!(info.backup_size, None);
    }
}
