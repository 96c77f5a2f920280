use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[cfg(test)]
mod testutil;

mod account;
mod cmd;
mod config;
mod csvimport;
mod filespec;
mod transaction;

use config::ConfigFile;
use filespec::FileSpec;

#[derive(Debug, Parser)]
/// Converts bank CSV exports (Amex, Mastercard and Nordea) into CSV files
/// for YNAB's file import.
struct Command {
    /// RON file with settings. Values given on the command line take
    /// precedence.
    #[arg(long = "config", env = "YNAB_CONFIG", global = true)]
    config: Option<FileSpec>,
    #[command(subcommand)]
    subcmd: SubCommand,
}

#[derive(Debug, Subcommand)]
enum SubCommand {
    /// Converts every export in the input directory into the output
    /// directory, then deletes the exports.
    #[command(name = "batch")]
    Batch(cmd::batch::Command),
    /// Converts a single export.
    #[command(name = "convert")]
    Convert(cmd::convert::Command),
}

fn main() -> Result<()> {
    // Logs go to stderr so that converted output can go to stdout.
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("ynabconvert=info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let cmd = Command::parse();
    let config_file = match &cmd.config {
        Some(file_spec) => ConfigFile::from_filespec(file_spec)?,
        None => ConfigFile::default(),
    };

    use SubCommand::*;
    match cmd.subcmd {
        Batch(cmd) => cmd.run(config_file),
        Convert(cmd) => cmd.run(config_file),
    }
}
