//! `logsink` command-line entry point.
use anyhow::Result;
use clap::Parser;

use logsink::cli::Cli;

fn main() -> Result<()> {
    let args = Cli::parse();
    logsink::commands::run(args)
}
