//! Passphrase session handling on top of the on-disk cache.
//!
//! Front-ends call into this module before every operation that needs the GPG
//! passphrase. A still-valid cached passphrase is reused; otherwise the user is
//! prompted. The passphrase is written back to the cache only after the
//! operation using it succeeded, so a mistyped passphrase is never cached.

use crate::cache::PassphraseCache;
use crate::constants::ENV_VAR_TEST_PASSPHRASE;
use crate::errors::{AppResult, CacheError, CryptoError};
use chrono::{DateTime, Utc};
use secrecy::{ExposeSecret, SecretString};
use tracing::{debug, warn};

/// Where the passphrase handed to an operation came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PassphraseSource {
    /// Read from a valid cache file.
    Cache,
    /// Entered by the user (or supplied via `PASSCACHE_TEST_PASSPHRASE`).
    Prompt,
}

/// Manages the passphrase lifecycle for a decryption workflow.
///
/// # Example
///
/// ```no_run
/// use passcache::cache::{CacheSettings, PassphraseCache};
/// use passcache::crypto::PassphraseSession;
/// use secrecy::ExposeSecret;
/// use std::time::Duration;
///
/// let session = PassphraseSession::new(PassphraseCache::new(CacheSettings {
///     path: "/home/user/.passcache/passphrase.cache".into(),
///     ttl: Duration::from_secs(30 * 60),
/// }));
///
/// // Prompts only if the cache is absent, expired or unusable, and
/// // re-caches the passphrase once the closure succeeds.
/// let plaintext = session.with_passphrase(|passphrase| {
///     Ok(format!("decrypted with {} chars", passphrase.expose_secret().len()))
/// })?;
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
#[derive(Debug, Clone)]
pub struct PassphraseSession {
    cache: PassphraseCache,
}

impl PassphraseSession {
    /// Create a session backed by `cache`.
    pub fn new(cache: PassphraseCache) -> Self {
        Self { cache }
    }

    /// The underlying cache.
    pub fn cache(&self) -> &PassphraseCache {
        &self.cache
    }

    /// Get the cached passphrase if one is present and unexpired.
    pub fn cached_passphrase(&self) -> Option<SecretString> {
        self.cache.lookup()
    }

    /// Cache `passphrase` for the configured lifetime.
    ///
    /// A failure is logged as a warning and returned; callers that treat the
    /// cache as optional can drop the error.
    pub fn remember(&self, passphrase: &SecretString) -> Result<DateTime<Utc>, CacheError> {
        self.cache
            .store(passphrase)
            .inspect_err(|e| warn!("Failed to cache passphrase: {}", e))
    }

    /// Remove any cached passphrase.
    pub fn forget(&self) -> Result<bool, CacheError> {
        self.cache.invalidate()
    }

    /// Prompts user for the GPG passphrase.
    ///
    /// # Errors
    ///
    /// Returns `CryptoError::PassphrasePrompt` if the terminal cannot be read and
    /// `CryptoError::EmptyPassphrase` if nothing was entered.
    pub fn prompt_for_passphrase() -> AppResult<SecretString> {
        // Non-interactive testing hook
        if let Ok(test_passphrase) = std::env::var(ENV_VAR_TEST_PASSPHRASE) {
            debug!("Using {} for non-interactive testing", ENV_VAR_TEST_PASSPHRASE);
            return validate_entered(test_passphrase);
        }

        debug!("Prompting for GPG passphrase");
        let passphrase = rpassword::prompt_password("Enter GPG passphrase: ")
            .map_err(|e| CryptoError::PassphrasePrompt(e.to_string()))?;
        validate_entered(passphrase)
    }

    /// Gets cached passphrase or prompts user if there is none.
    pub fn get_passphrase_or_prompt(&self) -> AppResult<(SecretString, PassphraseSource)> {
        match self.cached_passphrase() {
            Some(passphrase) => Ok((passphrase, PassphraseSource::Cache)),
            None => Ok((Self::prompt_for_passphrase()?, PassphraseSource::Prompt)),
        }
    }

    /// Runs `op` with a cached or prompted passphrase.
    ///
    /// When `op` succeeds the passphrase is cached again, which restarts its
    /// lifetime. When `op` fails nothing is cached and its error is returned.
    /// A failure to write the cache never fails the call.
    pub fn with_passphrase<T, F>(&self, op: F) -> AppResult<T>
    where
        F: FnOnce(&SecretString) -> AppResult<T>,
    {
        let (passphrase, source) = self.get_passphrase_or_prompt()?;
        self.run_and_remember(&passphrase, source, op)
    }

    fn run_and_remember<T, F>(
        &self,
        passphrase: &SecretString,
        source: PassphraseSource,
        op: F,
    ) -> AppResult<T>
    where
        F: FnOnce(&SecretString) -> AppResult<T>,
    {
        let result = op(passphrase);
        match &result {
            Ok(_) => {
                // Failure already logged by remember
                let _ = self.remember(passphrase);
            }
            Err(e) => debug!(
                "Operation failed with {:?} passphrase, not caching: {}",
                source, e
            ),
        }
        result
    }
}

fn validate_entered(passphrase: String) -> AppResult<SecretString> {
    let passphrase = SecretString::new(passphrase);
    if passphrase.expose_secret().is_empty() {
        return Err(CryptoError::EmptyPassphrase.into());
    }
    Ok(passphrase)
}
