//! Cryptographic operations for the passphrase cache.
//!
//! This module provides the cache key, the authenticated envelope the cache
//! record is sealed in, and the session layer that decides when to prompt.
//!
//! # Module Structure
//!
//! - `key`: Fixed cache key derivation
//! - `envelope`: AES-256-GCM seal/open with a versioned, base64 text layout
//! - `session`: Cached-or-prompt passphrase handling for decryption workflows
//!
//! # Example
//!
//! ```
//! use passcache::crypto::{open, seal, CacheKey};
//!
//! let key = CacheKey::derive();
//! let sealed = seal(&key, b"{\"passphrase\":\"...\"}")?;
//! let opened = open(&key, &sealed)?;
//! assert_eq!(opened.as_slice(), b"{\"passphrase\":\"...\"}");
//! # Ok::<(), passcache::errors::CacheError>(())
//! ```

pub mod envelope;
pub mod key;
pub mod session;

// Re-export commonly used types
pub use self::envelope::{open, seal};
pub use self::key::CacheKey;
pub use self::session::{PassphraseSession, PassphraseSource};
