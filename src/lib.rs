/*!
# passcache

passcache keeps the user's GPG passphrase in an encrypted, time-expiring cache
file, so that front-ends for a `pass`-style password store (GUI, TUI, HTTP, or
plain shell scripts) don't have to prompt before every decryption.

## Core Features

- Store a passphrase together with its expiry, sealed with AES-256-GCM
- Retrieve it from any process until the expiry passes
- Detect tampered, corrupted or foreign cache files instead of trusting them
- Prompt only when no valid cached passphrase exists, and re-cache only after
  the passphrase actually worked

## Architecture

- `cache`: The file-backed passphrase cache (store / retrieve / invalidate)
- `crypto`: Cache key derivation, the authenticated envelope, and passphrase sessions
- `config`: Configuration loading and validation
- `cli`: Command-line interface handling using clap
- `ops`: Operations behind the CLI subcommands
- `errors`: Error handling infrastructure

## Usage Example

```rust,no_run
use passcache::cache::PassphraseCache;
use passcache::crypto::PassphraseSession;
use passcache::Config;

fn main() -> passcache::AppResult<()> {
    let config = Config::load()?;
    config.validate()?;

    let session = PassphraseSession::new(PassphraseCache::new(config.cache_settings()));
    let _entry = session.with_passphrase(|_passphrase| {
        // Hand the passphrase to the GPG engine here.
        Ok("decrypted entry".to_string())
    })?;
    Ok(())
}
```
*/

/// The file-backed passphrase cache
pub mod cache;
/// Command-line interface for parsing and handling user arguments
pub mod cli;
/// Configuration loading and management
pub mod config;
/// Application-wide constants
pub mod constants;
/// Cache key, authenticated envelope and passphrase sessions
pub mod crypto;
/// Error types and utilities for error handling
pub mod errors;
/// Operations behind the CLI subcommands
pub mod ops;

// Re-export important types for convenience
pub use cache::{CacheLookup, CacheSettings, PassphraseCache};
pub use cli::CliArgs;
pub use config::Config;
pub use errors::{AppError, AppResult, CacheError};
