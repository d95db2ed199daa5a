//! Command: print version information.

/// Print the logsink version to stdout.
#[allow(clippy::print_stdout)]
pub fn run() {
    let version = option_env!("LOGSINK_VERSION").unwrap_or(env!("CARGO_PKG_VERSION"));
    println!("logsink {version}");
}
