//! Commands: rotate and reset.
use anyhow::{Context as _, Result};

use crate::manager::LogFile;

/// Rotate the log file now, regardless of its size.
///
/// # Errors
///
/// Returns an error if the path cannot be resolved or the rotation fails.
pub fn rotate(sink: &LogFile) -> Result<()> {
    sink.rotate().context("rotating log file")?;
    tracing::info!(
        backup = %sink.backup_path().map(|p| p.display().to_string()).unwrap_or_default(),
        "log file rotated"
    );
    Ok(())
}

/// Empty the log file and remove its backup.
///
/// # Errors
///
/// Returns an error if the path cannot be resolved or the file cannot be
/// reopened.
pub fn reset(sink: &LogFile) -> Result<()> {
    sink.reset().context("resetting log file")?;
    tracing::info!("log file reset");
    Ok(())
}
