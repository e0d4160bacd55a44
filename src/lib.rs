//! Core library entry for the `assignbot` daemon and CLI.

pub mod adapters;
pub mod assign;
pub mod cli;
pub mod config;
pub mod context;
pub mod cursor;
pub mod driver;
pub mod error;
pub mod ports;
pub mod transition;

use clap::Parser;

use crate::cli::Command;
use crate::config::Config;
use crate::context::ServiceContext;
use crate::error::{Error, Result};

/// Run the CLI with the provided arguments.
///
/// Loads configuration, builds the live service context, and dispatches to
/// daemon or one-shot mode. `run` mode never returns on success.
///
/// # Errors
///
/// Returns an error when argument parsing fails, when configuration is
/// missing or invalid, or when a one-shot cycle's fetch fails.
pub fn run<I, T>(args: I) -> Result<()>
where
    I: IntoIterator<Item = T>,
    T: Into<std::ffi::OsString> + Clone,
{
    let cli = match cli::Cli::try_parse_from(args) {
        Ok(cli) => cli,
        // Help and version requests are not errors.
        Err(err) if !err.use_stderr() => {
            let _ = err.print();
            return Ok(());
        }
        Err(err) => return Err(Error::Config(err.to_string())),
    };
    let config = Config::load(&cli.config)?;
    let ctx = ServiceContext::live(&config);

    match cli.command {
        Command::Run => driver::run_forever(&ctx, &config),
        Command::Once => {
            driver::run_once(&ctx, &config)?;
            Ok(())
        }
    }
}
