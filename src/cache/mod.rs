//! Encrypted, time-expiring passphrase cache.
//!
//! A [`PassphraseCache`] persists a single passphrase together with its expiry
//! timestamp in a file, sealed with AES-256-GCM under the fixed
//! [`CacheKey`](crate::crypto::CacheKey). Any process that knows the path can
//! reuse a still-valid passphrase, so a GUI restart or a separate CLI
//! invocation skips the prompt.
//!
//! Expiry is checked only when the file is read. An expired file is reported
//! as [`CacheLookup::Expired`] and left on disk until the next store or an
//! explicit [`PassphraseCache::invalidate`].
//!
//! # Example
//!
//! ```no_run
//! use passcache::cache::{CacheSettings, PassphraseCache};
//! use secrecy::{ExposeSecret, SecretString};
//! use std::time::Duration;
//!
//! let cache = PassphraseCache::new(CacheSettings {
//!     path: "/home/user/.passcache/passphrase.cache".into(),
//!     ttl: Duration::from_secs(30 * 60),
//! });
//!
//! cache.store(&SecretString::new("correct horse battery staple".to_string()))?;
//!
//! if let Some(passphrase) = cache.lookup() {
//!     assert_eq!(passphrase.expose_secret(), "correct horse battery staple");
//! }
//! # Ok::<(), passcache::errors::CacheError>(())
//! ```

mod file;

use crate::crypto::{self, CacheKey};
use crate::errors::CacheError;
use chrono::{DateTime, Utc};
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{debug, info, warn};
use zeroize::{Zeroize, Zeroizing};

/// Where the cache lives and how long a stored passphrase stays valid.
#[derive(Clone, PartialEq, Eq)]
pub struct CacheSettings {
    /// Location of the cache file.
    pub path: PathBuf,
    /// Lifetime applied by [`PassphraseCache::store`].
    pub ttl: Duration,
}

impl fmt::Debug for CacheSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CacheSettings")
            .field("path", &"[REDACTED_PATH]")
            .field("ttl", &self.ttl)
            .finish()
    }
}

/// The record sealed inside the cache file.
#[derive(Serialize, Deserialize)]
struct CacheRecord {
    passphrase: String,
    expires_at: DateTime<Utc>,
}

impl Drop for CacheRecord {
    fn drop(&mut self) {
        self.passphrase.zeroize();
    }
}

/// Outcome of reading a structurally sound cache file.
pub enum CacheLookup {
    /// The passphrase is still within its lifetime.
    Valid {
        /// The cached passphrase
        passphrase: SecretString,
        /// When the passphrase stops being valid
        expires_at: DateTime<Utc>,
    },
    /// The record decrypted correctly but its lifetime has passed.
    Expired {
        /// When the passphrase stopped being valid
        expired_at: DateTime<Utc>,
    },
}

impl CacheLookup {
    /// Returns `true` for [`CacheLookup::Valid`].
    pub fn is_valid(&self) -> bool {
        matches!(self, CacheLookup::Valid { .. })
    }

    /// The passphrase, if the record is still valid.
    pub fn into_passphrase(self) -> Option<SecretString> {
        match self {
            CacheLookup::Valid { passphrase, .. } => Some(passphrase),
            CacheLookup::Expired { .. } => None,
        }
    }
}

impl fmt::Debug for CacheLookup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CacheLookup::Valid { expires_at, .. } => f
                .debug_struct("Valid")
                .field("passphrase", &"[REDACTED]")
                .field("expires_at", expires_at)
                .finish(),
            CacheLookup::Expired { expired_at } => f
                .debug_struct("Expired")
                .field("expired_at", expired_at)
                .finish(),
        }
    }
}

/// File-backed passphrase cache.
///
/// There is no locking: concurrent stores to the same path race and the last
/// rename wins. Each store replaces the file atomically, so readers never see a
/// partially written record.
#[derive(Debug, Clone)]
pub struct PassphraseCache {
    settings: CacheSettings,
    key: CacheKey,
}

impl PassphraseCache {
    /// Creates a cache using the built-in key derivation.
    pub fn new(settings: CacheSettings) -> Self {
        Self::with_key(settings, CacheKey::derive())
    }

    /// Creates a cache sealing records under `key`.
    pub fn with_key(settings: CacheSettings, key: CacheKey) -> Self {
        Self { settings, key }
    }

    /// Path of the cache file.
    pub fn path(&self) -> &Path {
        &self.settings.path
    }

    /// Lifetime applied by [`PassphraseCache::store`].
    pub fn ttl(&self) -> Duration {
        self.settings.ttl
    }

    /// Stores `passphrase` for the configured lifetime, replacing any previous record.
    ///
    /// Returns the expiry timestamp that was written.
    ///
    /// # Errors
    ///
    /// - `CacheError::EmptyPassphrase` if `passphrase` is empty
    /// - `CacheError::InvalidTtl` if the lifetime is zero or out of range
    /// - `CacheError::Random`, `CacheError::Seal` or `CacheError::Serialize` if
    ///   sealing fails
    /// - `CacheError::Io` if the file cannot be written
    pub fn store(&self, passphrase: &SecretString) -> Result<DateTime<Utc>, CacheError> {
        self.store_for(passphrase, self.settings.ttl)
    }

    /// Stores `passphrase` valid for `ttl` from now.
    pub fn store_for(
        &self,
        passphrase: &SecretString,
        ttl: Duration,
    ) -> Result<DateTime<Utc>, CacheError> {
        self.store_at(passphrase, ttl, Utc::now())
    }

    pub(crate) fn store_at(
        &self,
        passphrase: &SecretString,
        ttl: Duration,
        now: DateTime<Utc>,
    ) -> Result<DateTime<Utc>, CacheError> {
        if passphrase.expose_secret().is_empty() {
            return Err(CacheError::EmptyPassphrase);
        }
        if ttl.is_zero() {
            return Err(CacheError::InvalidTtl("must be greater than zero".to_string()));
        }

        let expires_at = chrono::Duration::from_std(ttl)
            .ok()
            .and_then(|ttl| now.checked_add_signed(ttl))
            .ok_or_else(|| CacheError::InvalidTtl(format!("{:?} is out of range", ttl)))?;

        let record = CacheRecord {
            passphrase: passphrase.expose_secret().clone(),
            expires_at,
        };
        let plaintext = Zeroizing::new(serde_json::to_vec(&record).map_err(CacheError::Serialize)?);
        let sealed = crypto::seal(&self.key, &plaintext)?;

        file::write_atomic(&self.settings.path, &sealed)?;
        info!("Cached passphrase until {}", expires_at);
        Ok(expires_at)
    }

    /// Reads, authenticates and checks the expiry of the cached record.
    ///
    /// This never modifies the file, even when the record has expired.
    ///
    /// # Errors
    ///
    /// - `CacheError::NotFound` if no cache file exists
    /// - `CacheError::Io` for any other read failure
    /// - `CacheError::Decode`, `CacheError::Truncated` or
    ///   `CacheError::UnsupportedVersion` if the file is not a cache envelope
    /// - `CacheError::Integrity` if authentication fails
    /// - `CacheError::Malformed` if the decrypted payload is not a cache record
    pub fn retrieve(&self) -> Result<CacheLookup, CacheError> {
        self.retrieve_at(Utc::now())
    }

    pub(crate) fn retrieve_at(&self, now: DateTime<Utc>) -> Result<CacheLookup, CacheError> {
        let sealed = file::read(&self.settings.path)?;
        let plaintext = crypto::open(&self.key, &sealed)?;
        let mut record: CacheRecord =
            serde_json::from_slice(&plaintext).map_err(CacheError::Malformed)?;

        debug!(
            "Decrypted cached passphrase record (expires_at={}, now={})",
            record.expires_at, now
        );

        if now > record.expires_at {
            return Ok(CacheLookup::Expired {
                expired_at: record.expires_at,
            });
        }

        Ok(CacheLookup::Valid {
            passphrase: SecretString::new(std::mem::take(&mut record.passphrase)),
            expires_at: record.expires_at,
        })
    }

    /// Returns the cached passphrase if one is present, authentic and unexpired.
    ///
    /// Every other outcome collapses to `None`. A missing or expired record is
    /// logged at debug level; a record that cannot be trusted, or a file that
    /// cannot be read, is logged as a warning.
    pub fn lookup(&self) -> Option<SecretString> {
        match self.retrieve() {
            Ok(CacheLookup::Valid { passphrase, .. }) => {
                debug!("Using cached passphrase");
                Some(passphrase)
            }
            Ok(CacheLookup::Expired { expired_at }) => {
                debug!("Cached passphrase expired at {}", expired_at);
                None
            }
            Err(e) if e.is_not_found() => {
                debug!("No cached passphrase");
                None
            }
            Err(e) => {
                warn!("Ignoring unusable passphrase cache: {}", e);
                None
            }
        }
    }

    /// Deletes the cache file. Returns `false` if there was no file.
    ///
    /// # Errors
    ///
    /// Returns `CacheError::Io` if the file exists but cannot be removed.
    pub fn invalidate(&self) -> Result<bool, CacheError> {
        let removed = file::remove(&self.settings.path)?;
        if removed {
            info!("Removed cached passphrase");
        } else {
            debug!("No cached passphrase to remove");
        }
        Ok(removed)
    }
}
