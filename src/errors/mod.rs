//! Error handling utilities for the passcache application.
//!
//! This module provides the central error type `AppError` which represents all
//! possible error conditions that might occur in the application, as well as the
//! convenience type alias `AppResult` for functions that can return these errors.
//!
//! Cache expiry is deliberately absent from this taxonomy: an expired record is a
//! normal lookup outcome (see [`crate::cache::CacheLookup`]), not a failure.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Represents specific error cases that can occur when storing or retrieving
/// the cached passphrase.
///
/// Each variant names the step that failed. Callers that only care whether a
/// usable passphrase exists can collapse all of them to "prompt again", but the
/// variants keep "no cache file" and "cache file cannot be trusted" apart.
///
/// # Examples
///
/// ```
/// use passcache::errors::CacheError;
/// use std::path::PathBuf;
///
/// let error = CacheError::NotFound {
///     path: PathBuf::from("/home/user/.passcache/passphrase.cache"),
/// };
/// assert!(error.is_not_found());
/// assert!(!error.is_integrity_failure());
/// assert!(format!("{}", error).contains("passphrase.cache"));
/// ```
///
/// ```
/// use passcache::errors::CacheError;
///
/// let error = CacheError::Integrity;
/// assert!(error.is_integrity_failure());
/// assert!(format!("{}", error).contains("tampered"));
/// ```
#[derive(Debug, Error)]
pub enum CacheError {
    /// No cache file exists at the configured path.
    #[error("No cached passphrase at {path}")]
    NotFound {
        /// The cache file path that was read
        path: PathBuf,
    },

    /// Reading, writing or removing the cache file failed.
    #[error("Cache file I/O failed for {path}: {source}. Please check that the directory exists and is writable by the current user.")]
    Io {
        /// The cache file path involved
        path: PathBuf,
        /// The underlying I/O error
        #[source]
        source: io::Error,
    },

    /// The cache file is not valid base64 text.
    #[error("Cache file is not valid base64: {0}")]
    Decode(#[source] base64::DecodeError),

    /// The decoded cache data is shorter than the fixed header plus tag.
    #[error("Cache data is truncated: {len} bytes is shorter than the minimum of {min}")]
    Truncated {
        /// Number of decoded bytes
        len: usize,
        /// Minimum number of bytes a valid cache file decodes to
        min: usize,
    },

    /// The cache file was written by an incompatible format version.
    #[error("Unsupported cache format version {0}. Run `passcache clear` and cache the passphrase again.")]
    UnsupportedVersion(u8),

    /// Authentication of the sealed record failed.
    #[error("Cache file failed authentication: it was tampered with, corrupted, or written under a different key. Run `passcache clear` to remove it.")]
    Integrity,

    /// The decrypted payload is not a valid cache record.
    #[error("Cache record is malformed: {0}")]
    Malformed(#[source] serde_json::Error),

    /// The cache record could not be serialized.
    #[error("Failed to serialize cache record: {0}")]
    Serialize(#[source] serde_json::Error),

    /// Sealing the record failed.
    #[error("Failed to encrypt cache record")]
    Seal,

    /// The operating system random number generator is unavailable.
    #[error("Failed to generate cache nonce: {0}")]
    Random(#[source] rand::Error),

    /// An empty passphrase was offered for caching.
    #[error("Refusing to cache an empty passphrase")]
    EmptyPassphrase,

    /// The time-to-live is zero or too large to represent as a timestamp.
    #[error("Invalid cache time-to-live: {0}")]
    InvalidTtl(String),
}

impl CacheError {
    /// Returns `true` when the cache file simply does not exist.
    pub fn is_not_found(&self) -> bool {
        matches!(self, CacheError::NotFound { .. })
    }

    /// Returns `true` when the cache file exists but its contents cannot be trusted.
    pub fn is_integrity_failure(&self) -> bool {
        matches!(
            self,
            CacheError::Integrity
                | CacheError::Decode(_)
                | CacheError::Truncated { .. }
                | CacheError::UnsupportedVersion(_)
                | CacheError::Malformed(_)
        )
    }
}

/// Represents errors that occur while obtaining a passphrase from the user.
///
/// # Examples
///
/// ```
/// use passcache::errors::CryptoError;
///
/// let error = CryptoError::NoCachedPassphrase;
/// let message = format!("{}", error);
/// assert!(message.contains("No valid cached passphrase"));
/// ```
#[derive(Debug, Error)]
pub enum CryptoError {
    /// Reading the passphrase from the terminal failed.
    #[error("Failed to read passphrase: {0}")]
    PassphrasePrompt(String),

    /// The user entered an empty passphrase.
    #[error("Passphrase cannot be empty")]
    EmptyPassphrase,

    /// There is no valid cached passphrase and prompting was not requested.
    #[error("No valid cached passphrase. Run `passcache store` to cache one.")]
    NoCachedPassphrase,
}

/// Represents all possible errors that can occur in the passcache application.
///
/// This enum is the central error type used across the application, with variants
/// for different error categories. It uses `thiserror` for deriving the `Error` trait
/// implementation and formatted error messages.
///
/// # Examples
///
/// Creating a configuration error:
/// ```
/// use passcache::errors::AppError;
///
/// let error = AppError::Config("Cache file path is empty".to_string());
/// assert_eq!(format!("{}", error), "Configuration error: Cache file path is empty");
/// ```
///
/// Converting from a cache error:
/// ```
/// use passcache::errors::{AppError, CacheError};
///
/// let app_error: AppError = CacheError::Integrity.into();
/// assert!(matches!(app_error, AppError::Cache(CacheError::Integrity)));
/// ```
#[derive(Debug, Error)]
pub enum AppError {
    /// Errors related to configuration loading or validation.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Input/output errors outside the cache file itself (stdin, stdout).
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Errors from storing, retrieving or invalidating the cached passphrase.
    #[error("Cache error: {0}")]
    Cache(#[from] CacheError),

    /// Errors obtaining a passphrase from the user.
    #[error("Passphrase error: {0}")]
    Crypto(#[from] CryptoError),
}

/// A type alias for `Result<T, AppError>` to simplify function signatures.
///
/// # Examples
///
/// ```
/// use passcache::errors::{AppResult, AppError};
///
/// fn might_fail() -> AppResult<String> {
///     if false {
///         return Err(AppError::Config("Something went wrong".to_string()));
///     }
///     Ok("Operation succeeded".to_string())
/// }
/// ```
pub type AppResult<T> = Result<T, AppError>;
