//! Command-line interface for the passcache binary.

use crate::config::Config;
use crate::constants::{APP_DESCRIPTION, APP_NAME};
use crate::errors::AppResult;
use clap::{Parser, Subcommand, ValueEnum};
use std::time::Duration;

/// Encrypted, time-expiring GPG passphrase cache
#[derive(Parser, Debug)]
#[command(name = APP_NAME, about = APP_DESCRIPTION, author, version, long_about = None)]
pub struct CliArgs {
    /// Cache file location (overrides PASSCACHE_FILE)
    #[arg(long, global = true, value_name = "PATH")]
    pub cache_file: Option<String>,

    /// Cache lifetime in seconds (overrides PASSCACHE_TTL)
    #[arg(long, global = true, value_name = "SECONDS", value_parser = parse_ttl_arg)]
    pub ttl: Option<Duration>,

    /// Print verbose output
    #[arg(short = 'v', long, global = true)]
    pub verbose: bool,

    /// Log output format
    #[arg(long, global = true, value_enum, default_value_t = LogFormat::Text)]
    pub log_format: LogFormat,

    #[command(subcommand)]
    pub command: Command,
}

/// Structured log output formats.
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    /// Human-readable lines
    Text,
    /// One JSON object per line
    Json,
}

#[derive(Subcommand, Debug, PartialEq, Eq)]
pub enum Command {
    /// Cache a passphrase, replacing any cached one
    Store {
        /// Read the passphrase from the first line of stdin instead of prompting
        #[arg(long)]
        stdin: bool,
    },
    /// Print the cached passphrase if it is still valid
    Get,
    /// Report whether a valid passphrase is cached
    Status,
    /// Remove the cache file
    Clear,
}

fn parse_ttl_arg(value: &str) -> Result<Duration, String> {
    Config::parse_ttl(value).map_err(|e| e.to_string())
}

impl CliArgs {
    /// Builds the effective configuration: environment first, flags on top.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Config` if loading, path expansion or validation fails.
    pub fn config(&self) -> AppResult<Config> {
        let config = Config::load_with(self.cache_file.as_deref(), self.ttl)?;
        config.validate()?;
        Ok(config)
    }
}
