//! Command-line argument definitions for the `logsink` binary.
use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::record::Level;

/// Top-level CLI entry point for the log sink.
#[derive(Parser, Debug)]
#[command(
    name = "logsink",
    about = "Append to a size-rotated application log file",
    version
)]
pub struct Cli {
    #[allow(missing_docs)]
    #[command(subcommand)]
    pub command: Command,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[allow(missing_docs)]
    #[command(flatten)]
    pub global: GlobalOpts,
}

/// Options shared across all subcommands. Each overrides the config file.
#[derive(Parser, Debug, Clone, Default)]
pub struct GlobalOpts {
    /// TOML configuration file
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Log file path
    #[arg(long, global = true)]
    pub path: Option<PathBuf>,

    /// Rotation threshold in bytes (0 disables rotation)
    #[arg(long, global = true)]
    pub max_size: Option<u64>,

    /// Append to an existing log file on first write
    #[arg(long, global = true, conflicts_with = "truncate")]
    pub append: bool,

    /// Truncate an existing log file on first write
    #[arg(long, global = true)]
    pub truncate: bool,

    /// Mirror written lines to stderr
    #[arg(long, global = true)]
    pub mirror: bool,

    /// Escape control characters in messages
    #[arg(long, global = true)]
    pub escape: bool,
}

/// Available subcommands.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Write one message
    Write(WriteOpts),
    /// Write each line read from stdin
    Pipe(PipeOpts),
    /// Move the log file to its backup and start a new one
    Rotate,
    /// Empty the log file and remove its backup
    Reset,
    /// Print resolved paths, sizes and options as JSON
    Info,
    /// Print version information
    Version,
}

/// Record metadata shared by `write` and `pipe`.
#[derive(Parser, Debug, Clone)]
pub struct RecordOpts {
    /// Component token
    #[arg(long, default_value = "main")]
    pub component: String,

    /// Severity (critical, error, warning, info, debug, trace)
    #[arg(short, long, default_value = "info")]
    pub level: Level,

    /// Source file to record
    #[arg(long)]
    pub file: Option<String>,

    /// Source line to record
    #[arg(long)]
    pub line: Option<u32>,

    /// Function name to record
    #[arg(long)]
    pub function: Option<String>,
}

/// Options for the `write` subcommand.
#[derive(Parser, Debug, Clone)]
pub struct WriteOpts {
    #[allow(missing_docs)]
    #[command(flatten)]
    pub record: RecordOpts,

    /// Message template; `{}` placeholders are filled from ARGS
    pub template: String,

    /// Positional arguments for the template
    pub args: Vec<String>,
}

/// Options for the `pipe` subcommand.
#[derive(Parser, Debug, Clone)]
pub struct PipeOpts {
    #[allow(missing_docs)]
    #[command(flatten)]
    pub record: RecordOpts,
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used, clippy::panic)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn verify_cli() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parse_write_with_args() {
        let cli = Cli::parse_from([
            "logsink",
            "write",
            "--component",
            "auth",
            "-l",
            "warn",
            "user {} failed {} times",
            "alice",
            "3",
        ]);
        let Command::Write(opts) = cli.command else {
            panic!("expected write");
        };
        assert_eq!(opts.record.component, "auth");
        assert_eq!(opts.record.level, Level::Warning);
        assert_eq!(opts.template, "user {} failed {} times");
        assert_eq!(opts.args, vec!["alice", "3"]);
    }

    #[test]
    fn write_defaults() {
        let cli = Cli::parse_from(["logsink", "write", "hello"]);
        let Command::Write(opts) = cli.command else {
            panic!("expected write");
        };
        assert_eq!(opts.record.component, "main");
        assert_eq!(opts.record.level, Level::Info);
        assert!(opts.args.is_empty());
    }

    #[test]
    fn global_overrides_parse_after_subcommand() {
        let cli = Cli::parse_from([
            "logsink",
            "rotate",
            "--path",
            "/tmp/a.log",
            "--max-size",
            "1024",
            "--truncate",
        ]);
        assert!(matches!(cli.command, Command::Rotate));
        assert_eq!(cli.global.path, Some(PathBuf::from("/tmp/a.log")));
        assert_eq!(cli.global.max_size, Some(1024));
        assert!(cli.global.truncate);
        assert!(!cli.global.mirror);
    }

    #[test]
    fn append_and_truncate_conflict() {
        assert!(Cli::try_parse_from(["logsink", "reset", "--append", "--truncate"]).is_err());
    }

    #[test]
    fn rejects_unknown_level() {
        assert!(Cli::try_parse_from(["logsink", "write", "-l", "loud", "x"]).is_err());
    }

    #[test]
    fn parse_simple_commands() {
        assert!(matches!(
            Cli::parse_from(["logsink", "info"]).command,
            Command::Info
        ));
        assert!(matches!(
            Cli::parse_from(["logsink", "reset"]).command,
            Command::Reset
        ));
        assert!(matches!(
            Cli::parse_from(["logsink", "version"]).command,
            Command::Version
        ));
        assert!(Cli::parse_from(["logsink", "-v", "pipe"]).verbose);
    }
}
