//! High-level operations behind the `passcache` subcommands.
//!
//! Each operation takes an explicit [`PassphraseCache`] so the binary, other
//! front-ends and tests can point it at any cache file.

use crate::cache::{CacheLookup, PassphraseCache};
use crate::errors::{AppResult, CacheError, CryptoError};
use chrono::{DateTime, SecondsFormat, Utc};
use secrecy::{ExposeSecret, SecretString};
use std::fmt;
use std::io::{BufRead, Write};
use tracing::{debug, warn};
use zeroize::Zeroizing;

/// What `passcache status` reports about the cache file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CacheStatus {
    /// A passphrase is cached and usable until the given time.
    Valid(DateTime<Utc>),
    /// The cached passphrase expired at the given time.
    Expired(DateTime<Utc>),
    /// No cache file exists.
    Absent,
    /// The cache file exists but cannot be trusted.
    Untrusted(String),
}

impl fmt::Display for CacheStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CacheStatus::Valid(at) => write!(
                f,
                "valid until {}",
                at.to_rfc3339_opts(SecondsFormat::Secs, true)
            ),
            CacheStatus::Expired(at) => write!(
                f,
                "expired at {}",
                at.to_rfc3339_opts(SecondsFormat::Secs, true)
            ),
            CacheStatus::Absent => write!(f, "absent"),
            CacheStatus::Untrusted(reason) => write!(f, "untrusted: {}", reason),
        }
    }
}

/// Reads a passphrase from the first line of `reader`, without its line ending.
///
/// # Errors
///
/// Returns `AppError::Io` if reading fails and `CryptoError::EmptyPassphrase`
/// if the line is empty.
pub fn read_passphrase_line<R: BufRead>(mut reader: R) -> AppResult<SecretString> {
    let mut line = Zeroizing::new(String::new());
    reader.read_line(&mut *line)?;

    let passphrase = line.trim_end_matches(&['\n', '\r'][..]);
    if passphrase.is_empty() {
        return Err(CryptoError::EmptyPassphrase.into());
    }
    Ok(SecretString::new(passphrase.to_string()))
}

/// Caches `passphrase` for the cache's configured lifetime.
pub fn store_passphrase(
    cache: &PassphraseCache,
    passphrase: &SecretString,
) -> AppResult<DateTime<Utc>> {
    Ok(cache.store(passphrase)?)
}

/// Writes the cached passphrase and a newline to `out`.
///
/// # Errors
///
/// Returns `CryptoError::NoCachedPassphrase` if there is no valid cached
/// passphrase, whatever the reason.
pub fn print_passphrase<W: Write>(cache: &PassphraseCache, out: &mut W) -> AppResult<()> {
    let passphrase = cache.lookup().ok_or(CryptoError::NoCachedPassphrase)?;
    writeln!(out, "{}", passphrase.expose_secret())?;
    out.flush()?;
    Ok(())
}

/// Inspects the cache file without changing it.
///
/// # Errors
///
/// I/O failures other than a missing file are returned as `CacheError::Io`.
pub fn cache_status(cache: &PassphraseCache) -> AppResult<CacheStatus> {
    let status = match cache.retrieve() {
        Ok(CacheLookup::Valid { expires_at, .. }) => CacheStatus::Valid(expires_at),
        Ok(CacheLookup::Expired { expired_at }) => CacheStatus::Expired(expired_at),
        Err(e) if e.is_not_found() => CacheStatus::Absent,
        Err(e) if e.is_integrity_failure() => {
            warn!("Cache file cannot be trusted: {}", e);
            CacheStatus::Untrusted(e.to_string())
        }
        Err(e @ CacheError::Io { .. }) => return Err(e.into()),
        Err(e) => CacheStatus::Untrusted(e.to_string()),
    };
    debug!("Cache status: {}", status);
    Ok(status)
}

/// Removes the cache file. Returns `false` if there was none.
pub fn clear_cache(cache: &PassphraseCache) -> AppResult<bool> {
    Ok(cache.invalidate()?)
}
