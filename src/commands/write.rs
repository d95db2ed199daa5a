//! Command: write one message.
use anyhow::Result;
use std::fmt::Display;

use crate::cli::WriteOpts;
use crate::manager::LogFile;
use crate::record::CallSite;
use crate::template;

/// Interpolate the template with its arguments and write it to `sink`.
///
/// # Errors
///
/// Returns an error if the record could not be written to the log file.
pub fn run(sink: &LogFile, opts: &WriteOpts) -> Result<()> {
    let args: Vec<&dyn Display> = opts.args.iter().map(|a| a as &dyn Display).collect();
    let site = CallSite {
        file: opts.record.file.as_deref(),
        line: opts.record.line,
        function: opts.record.function.as_deref(),
    };
    if template::placeholder_count(&opts.template) != Some(opts.args.len()) {
        tracing::warn!(
            args = opts.args.len(),
            "template does not match its arguments, writing it literally"
        );
    }
    let before = sink.dropped_records();
    sink.log_template(
        &opts.record.component,
        opts.record.level,
        site,
        &opts.template,
        &args,
    );
    super::ensure_written(sink, before)
}
