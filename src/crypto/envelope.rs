//! Authenticated encryption of the cache payload.
//!
//! The sealed form is text: `base64(version || nonce || ciphertext || tag)`.
//! The version byte and nonce are fixed-length, so the reader can split the
//! decoded bytes without a length prefix.

use crate::constants::{CACHE_FORMAT_VERSION, CACHE_NONCE_LEN, CACHE_TAG_LEN};
use crate::crypto::CacheKey;
use crate::errors::CacheError;
use aes_gcm::aead::{Aead, KeyInit};
use aes_gcm::{Aes256Gcm, Key, Nonce};
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use rand::rngs::OsRng;
use rand::RngCore;
use zeroize::Zeroizing;

/// Smallest number of decoded bytes a well-formed envelope can have.
pub const MIN_SEALED_LEN: usize = 1 + CACHE_NONCE_LEN + CACHE_TAG_LEN;

fn cipher(key: &CacheKey) -> Aes256Gcm {
    // The key is a fixed 32-byte array, so construction cannot fail.
    Aes256Gcm::new(Key::<Aes256Gcm>::from_slice(key.as_bytes()))
}

/// Seal `plaintext` under `key` with a fresh random nonce.
///
/// # Errors
///
/// Returns `CacheError::Random` if the OS random source is unavailable and
/// `CacheError::Seal` if encryption fails.
///
/// # Example
///
/// ```
/// use passcache::crypto::{open, seal, CacheKey};
///
/// let key = CacheKey::derive();
/// let sealed = seal(&key, b"payload")?;
/// assert_eq!(open(&key, &sealed)?.as_slice(), b"payload");
/// # Ok::<(), passcache::errors::CacheError>(())
/// ```
pub fn seal(key: &CacheKey, plaintext: &[u8]) -> Result<String, CacheError> {
    let mut nonce_bytes = [0u8; CACHE_NONCE_LEN];
    OsRng
        .try_fill_bytes(&mut nonce_bytes)
        .map_err(CacheError::Random)?;

    let ciphertext = cipher(key)
        .encrypt(Nonce::from_slice(&nonce_bytes), plaintext)
        .map_err(|_| CacheError::Seal)?;

    let mut sealed = Vec::with_capacity(1 + CACHE_NONCE_LEN + ciphertext.len());
    sealed.push(CACHE_FORMAT_VERSION);
    sealed.extend_from_slice(&nonce_bytes);
    sealed.extend_from_slice(&ciphertext);

    Ok(STANDARD.encode(sealed))
}

/// Open text produced by [`seal`], verifying its authentication tag.
///
/// Surrounding ASCII whitespace is ignored. Nothing is returned unless the tag
/// verifies, so a tampered envelope never yields partial plaintext.
///
/// # Errors
///
/// - `CacheError::Decode` if the text is not base64
/// - `CacheError::Truncated` if the decoded data is too short
/// - `CacheError::UnsupportedVersion` if the version byte is unknown
/// - `CacheError::Integrity` if authentication fails
pub fn open(key: &CacheKey, sealed: &str) -> Result<Zeroizing<Vec<u8>>, CacheError> {
    let decoded = STANDARD
        .decode(sealed.trim().as_bytes())
        .map_err(CacheError::Decode)?;

    if decoded.len() < MIN_SEALED_LEN {
        return Err(CacheError::Truncated {
            len: decoded.len(),
            min: MIN_SEALED_LEN,
        });
    }

    let (version, rest) = decoded.split_at(1);
    if version[0] != CACHE_FORMAT_VERSION {
        return Err(CacheError::UnsupportedVersion(version[0]));
    }

    let (nonce_bytes, ciphertext) = rest.split_at(CACHE_NONCE_LEN);
    let plaintext = cipher(key)
        .decrypt(Nonce::from_slice(nonce_bytes), ciphertext)
        .map_err(|_| CacheError::Integrity)?;

    Ok(Zeroizing::new(plaintext))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn decode(sealed: &str) -> Vec<u8> {
        STANDARD.decode(sealed).unwrap()
    }

    #[test]
    fn test_seal_open_roundtrip() {
        let key = CacheKey::derive();
        let sealed = seal(&key, b"{\"passphrase\":\"x\"}").unwrap();

        let opened = open(&key, &sealed).unwrap();
        assert_eq!(opened.as_slice(), b"{\"passphrase\":\"x\"}");
    }

    #[test]
    fn test_layout_is_version_nonce_ciphertext() {
        let key = CacheKey::derive();
        let plaintext = b"twelve bytes";
        let bytes = decode(&seal(&key, plaintext).unwrap());

        assert_eq!(bytes[0], CACHE_FORMAT_VERSION);
        assert_eq!(bytes.len(), MIN_SEALED_LEN + plaintext.len());
    }

    #[test]
    fn test_fresh_nonce_per_seal() {
        let key = CacheKey::derive();
        let first = decode(&seal(&key, b"same").unwrap());
        let second = decode(&seal(&key, b"same").unwrap());

        assert_ne!(
            &first[1..1 + CACHE_NONCE_LEN],
            &second[1..1 + CACHE_NONCE_LEN]
        );
        assert_ne!(first, second);
    }

    #[test]
    fn test_every_flipped_byte_fails_authentication() {
        let key = CacheKey::derive();
        let bytes = decode(&seal(&key, b"secret payload").unwrap());

        for index in 1..bytes.len() {
            let mut tampered = bytes.clone();
            tampered[index] ^= 0x01;
            let result = open(&key, &STANDARD.encode(&tampered));
            assert!(
                matches!(result, Err(CacheError::Integrity)),
                "flipping byte {} should fail authentication",
                index
            );
        }
    }

    #[test]
    fn test_wrong_key_fails_authentication() {
        let sealed = seal(&CacheKey::derive(), b"secret").unwrap();
        let result = open(&CacheKey::from_seed(b"another seed"), &sealed);
        assert!(matches!(result, Err(CacheError::Integrity)));
    }

    #[test]
    fn test_unknown_version_is_rejected() {
        let key = CacheKey::derive();
        let mut bytes = decode(&seal(&key, b"secret").unwrap());
        bytes[0] = 7;

        let result = open(&key, &STANDARD.encode(&bytes));
        assert!(matches!(result, Err(CacheError::UnsupportedVersion(7))));
    }

    #[test]
    fn test_truncated_data_is_rejected() {
        let key = CacheKey::derive();
        let short = STANDARD.encode([CACHE_FORMAT_VERSION; 10]);

        match open(&key, &short) {
            Err(CacheError::Truncated { len, min }) => {
                assert_eq!(len, 10);
                assert_eq!(min, MIN_SEALED_LEN);
            }
            other => panic!("Expected Truncated, got {:?}", other),
        }
    }

    #[test]
    fn test_non_base64_is_rejected() {
        let result = open(&CacheKey::derive(), "not base64 at all!");
        assert!(matches!(result, Err(CacheError::Decode(_))));
    }

    #[test]
    fn test_surrounding_whitespace_is_ignored() {
        let key = CacheKey::derive();
        let sealed = format!("  {}\n", seal(&key, b"secret").unwrap());
        assert_eq!(open(&key, &sealed).unwrap().as_slice(), b"secret");
    }
}
