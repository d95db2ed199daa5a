//! Subcommand orchestration for the `logsink` binary.
pub mod info;
pub mod lifecycle;
pub mod pipe;
pub mod version;
pub mod write;

use anyhow::{Context as _, Result, bail};
use crate::cli::{Cli, Command, GlobalOpts};
use crate::config::Config;
use crate::manager::LogFile;
use crate::subscriber::init_subscriber;

/// Load the config file named by `--config` (defaults if absent) and apply
/// the command-line overrides on top.
///
/// `--append` or `--truncate` override `append-to-existing`. Without either
/// flag the config file decides, and without a config file the tool appends,
/// since each invocation is a separate process.
///
/// # Errors
///
/// Returns an error if the config file cannot be read or is invalid.
pub fn resolve_config(global: &GlobalOpts) -> Result<Config> {
    let mut config = match &global.config {
        Some(path) => Config::load(path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => Config::default(),
    };
    if let Some(path) = &global.path {
        config.path = Some(path.clone());
    }
    if let Some(max_size) = global.max_size {
        config.max_size = max_size;
    }
    if global.append || global.truncate || global.config.is_none() {
        config.append_to_existing = !global.truncate;
    }
    config.mirror_to_stderr |= global.mirror;
    config.escape_special_characters |= global.escape;
    config.validate()?;
    Ok(config)
}

/// Fail if `sink` dropped any record since `dropped_before` was sampled.
///
/// # Errors
///
/// Returns the sink's last error when records were dropped.
pub fn ensure_written(sink: &LogFile, dropped_before: u64) -> Result<()> {
    let dropped = sink.dropped_records().saturating_sub(dropped_before);
    if dropped == 0 {
        return Ok(());
    }
    match sink.last_error() {
        Some(e) => Err(anyhow::Error::new(e).context(format!("{dropped} record(s) not written"))),
        None => bail!("{dropped} record(s) not written"),
    }
}

/// Run the parsed command line.
///
/// # Errors
///
/// Returns an error if configuration fails or the selected command fails.
pub fn run(cli: Cli) -> Result<()> {
    if matches!(cli.command, Command::Version) {
        version::run();
        return Ok(());
    }

    init_subscriber(cli.verbose, None);
    let config = resolve_config(&cli.global)?;

    match cli.command {
        Command::Write(opts) => write::run(&open_sink(config)?, &opts),
        Command::Pipe(opts) => {
            let sink = open_sink(config)?;
            let stdin = std::io::stdin();
            pipe::run(&sink, &opts, stdin.lock()).map(|_| ())
        }
        Command::Rotate => lifecycle::rotate(&LogFile::new(config)),
        Command::Reset => lifecycle::reset(&LogFile::new(config)),
        Command::Info => info::run(&LogFile::new(config)),
        Command::Version => Ok(()),
    }
}

/// Build a sink for a writing command and open it up front, so an unusable
/// destination fails before any input is consumed.
fn open_sink(config: Config) -> Result<LogFile> {
    LogFile::try_new(config).context("opening log file")
}
