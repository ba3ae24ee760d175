/*!
# passcache - Encrypted GPG Passphrase Cache

Command-line front end for the passphrase cache. Other tools can share the
cache file through it: `passcache get` prints a still-valid passphrase, and
`passcache store` caches a new one.

## Usage

```
passcache [OPTIONS] <COMMAND>

Commands:
  store   Cache a passphrase, replacing any cached one
  get     Print the cached passphrase if it is still valid
  status  Report whether a valid passphrase is cached
  clear   Remove the cache file

Options:
      --cache-file <PATH>      Cache file location (overrides PASSCACHE_FILE)
      --ttl <SECONDS>          Cache lifetime in seconds (overrides PASSCACHE_TTL)
  -v, --verbose                Print verbose output
      --log-format <FORMAT>    Log output format [default: text] [possible values: text, json]
```

## Configuration

- `PASSCACHE_FILE`: Cache file location (defaults to "~/.passcache/passphrase.cache")
- `PASSCACHE_TTL`: Cache lifetime in seconds (defaults to 1800)
- `RUST_LOG`: Log filter (defaults to "info", or "debug" with `--verbose`)
*/

use clap::Parser;
use passcache::cache::PassphraseCache;
use passcache::cli::{CliArgs, Command, LogFormat};
use passcache::constants::{
    DEFAULT_LOG_LEVEL, TRACING_ROOT_SPAN_NAME, TRACING_SERVICE_NAME, VERBOSE_LOG_LEVEL,
};
use passcache::crypto::PassphraseSession;
use passcache::errors::AppResult;
use passcache::ops;
use std::io;
use std::process::ExitCode;
use tracing::{debug, error, info};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Installs the global tracing subscriber. Logs go to stderr so that stdout
/// carries nothing but command output.
fn init_tracing(format: LogFormat, verbose: bool) {
    let filter = if verbose {
        EnvFilter::new(VERBOSE_LOG_LEVEL)
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_LEVEL))
    };

    let registry = tracing_subscriber::registry().with(filter);
    match format {
        LogFormat::Json => registry
            .with(fmt::layer().json().with_writer(io::stderr))
            .init(),
        LogFormat::Text => registry
            .with(fmt::layer().with_writer(io::stderr))
            .init(),
    }
}

fn run(args: CliArgs) -> AppResult<()> {
    let config = args.config()?;
    debug!("Configuration: {:?}", config);

    let cache = PassphraseCache::new(config.cache_settings());

    match args.command {
        Command::Store { stdin } => {
            let passphrase = if stdin {
                ops::read_passphrase_line(io::stdin().lock())?
            } else {
                PassphraseSession::prompt_for_passphrase()?
            };
            let expires_at = ops::store_passphrase(&cache, &passphrase)?;
            eprintln!("Passphrase cached until {}", expires_at.to_rfc3339());
        }
        Command::Get => ops::print_passphrase(&cache, &mut io::stdout().lock())?,
        Command::Status => println!("{}", ops::cache_status(&cache)?),
        Command::Clear => {
            if ops::clear_cache(&cache)? {
                eprintln!("Cached passphrase removed");
            } else {
                eprintln!("No cached passphrase");
            }
        }
    }
    Ok(())
}

/// The main entry point for the passcache application.
///
/// Parses arguments, initializes logging, then runs the requested subcommand
/// inside a root span carrying a per-invocation correlation id. Errors are
/// logged once here and reported on stderr with a non-zero exit status.
fn main() -> ExitCode {
    let args = CliArgs::parse();
    init_tracing(args.log_format, args.verbose);

    let correlation_id = uuid::Uuid::new_v4();
    let root_span = tracing::info_span!(
        TRACING_ROOT_SPAN_NAME,
        service = TRACING_SERVICE_NAME,
        correlation_id = %correlation_id
    );
    let _guard = root_span.enter();

    info!("Starting passcache");
    match run(args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{}", e);
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}
