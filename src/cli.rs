//! CLI argument definitions.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Top-level CLI parser for `assignbot`.
#[derive(Debug, Parser)]
#[command(name = "assignbot", version, about = "Auto-assign new Jira issues by label")]
pub struct Cli {
    /// Path to the YAML configuration file.
    #[arg(long, global = true, default_value = "config/config.yaml")]
    pub config: PathBuf,

    /// The command to execute.
    #[command(subcommand)]
    pub command: Command,
}

/// Supported top-level subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Poll continuously until killed (daemon mode).
    Run,
    /// Execute a single fetch + process cycle and exit (triggered mode).
    Once,
}
