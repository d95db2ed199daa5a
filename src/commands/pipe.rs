//! Command: write each stdin line as a record.
use anyhow::{Context as _, Result};
use std::io::BufRead;

use crate::cli::PipeOpts;
use crate::manager::LogFile;
use crate::record::{CallSite, LogRecord};

/// Read `input` line by line and write each line to `sink`.
///
/// Lines are written as literal messages (no template interpolation).
/// Returns the number of lines read.
///
/// # Errors
///
/// Returns an error if reading `input` fails or any record was dropped.
pub fn run(sink: &LogFile, opts: &PipeOpts, input: impl BufRead) -> Result<usize> {
    let site = CallSite {
        file: opts.record.file.as_deref(),
        line: opts.record.line,
        function: opts.record.function.as_deref(),
    };
    let before = sink.dropped_records();
    let mut count = 0;
    for line in input.lines() {
        let line = line.context("reading stdin")?;
        let record =
            LogRecord::new(&opts.record.component, opts.record.level, line).located(site);
        sink.log(&record);
        count += 1;
    }
    tracing::debug!(lines = count, "pipe finished");
    super::ensure_written(sink, before)?;
    Ok(count)
}
