//! Cache key derivation.
//!
//! The cache key is derived from a constant seed, so any local reader of the
//! binary can reproduce it. It protects the cache file against casual
//! inspection, not against an attacker running as the same user.
//! [`CacheKey::derive`] is the only place the key material is chosen.

use crate::constants::{CACHE_KEY_CONTEXT, CACHE_KEY_LEN, CACHE_KEY_SEED, REDACTED_PLACEHOLDER};
use std::fmt;
use zeroize::Zeroizing;

/// A 256-bit symmetric key for sealing the cache record.
///
/// The bytes are zeroized on drop and never appear in `Debug` output.
///
/// # Example
///
/// ```
/// use passcache::crypto::CacheKey;
///
/// // Derivation is stable across calls and process restarts.
/// assert_eq!(CacheKey::derive(), CacheKey::derive());
/// assert!(format!("{:?}", CacheKey::derive()).contains("REDACTED"));
/// ```
#[derive(Clone, PartialEq, Eq)]
pub struct CacheKey(Zeroizing<[u8; CACHE_KEY_LEN]>);

impl CacheKey {
    /// Derive the cache key from the built-in seed.
    pub fn derive() -> Self {
        Self::from_seed(CACHE_KEY_SEED)
    }

    /// Derive a key from arbitrary seed material using BLAKE3's KDF mode.
    pub fn from_seed(seed: &[u8]) -> Self {
        Self(Zeroizing::new(blake3::derive_key(CACHE_KEY_CONTEXT, seed)))
    }

    /// Wrap raw key bytes, e.g. material loaded from an OS keychain.
    pub fn from_bytes(bytes: [u8; CACHE_KEY_LEN]) -> Self {
        Self(Zeroizing::new(bytes))
    }

    pub(crate) fn as_bytes(&self) -> &[u8; CACHE_KEY_LEN] {
        &self.0
    }
}

impl Default for CacheKey {
    fn default() -> Self {
        Self::derive()
    }
}

impl fmt::Debug for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("CacheKey")
            .field(&REDACTED_PLACEHOLDER)
            .finish()
    }
}
