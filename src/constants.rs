//! Constants used throughout the application.
//!
//! This module contains all constants used in the passcache application, organized
//! into logical groups. Having constants centralized makes them easier to find,
//! modify, and reference consistently.

// Application Metadata
/// The name of the application.
pub const APP_NAME: &str = "passcache";
/// The description of the application used in CLI help text.
pub const APP_DESCRIPTION: &str = "Encrypted, time-expiring GPG passphrase cache";

// CLI Arguments & Defaults
/// Default log level.
pub const DEFAULT_LOG_LEVEL: &str = "info";
/// Log level used when `--verbose` is passed.
pub const VERBOSE_LOG_LEVEL: &str = "debug";

// Configuration Keys & Environment Variables
/// Environment variable for the cache file location.
pub const ENV_VAR_PASSCACHE_FILE: &str = "PASSCACHE_FILE";
/// Environment variable for the cache time-to-live, in seconds.
pub const ENV_VAR_PASSCACHE_TTL: &str = "PASSCACHE_TTL";
/// Environment variable that bypasses the interactive passphrase prompt.
pub const ENV_VAR_TEST_PASSPHRASE: &str = "PASSCACHE_TEST_PASSPHRASE";
/// Standard environment variable for the user's home directory.
pub const ENV_VAR_HOME: &str = "HOME";
/// Default cache file location relative to the user's home directory.
pub const DEFAULT_CACHE_SUBPATH: &str = ".passcache/passphrase.cache";
/// Default cache lifetime: 30 minutes.
pub const DEFAULT_CACHE_TTL_SECS: u64 = 30 * 60;

// Validation
/// Placeholder string for redacted information in debug output.
pub const REDACTED_PLACEHOLDER: &str = "[REDACTED]";

// Cache File Format
/// Format version byte written at the start of every cache file.
pub const CACHE_FORMAT_VERSION: u8 = 1;
/// AES-256-GCM key length in bytes.
pub const CACHE_KEY_LEN: usize = 32;
/// AES-GCM nonce length in bytes.
pub const CACHE_NONCE_LEN: usize = 12;
/// AES-GCM authentication tag length in bytes.
pub const CACHE_TAG_LEN: usize = 16;
/// BLAKE3 key-derivation context for the cache key.
pub const CACHE_KEY_CONTEXT: &str = "passcache 2024-06-01 passphrase cache key v1";
/// Constant seed the cache key is derived from.
pub const CACHE_KEY_SEED: &[u8] = b"passcache-static-cache-key";

// File System Parameters
/// Default POSIX permissions for newly created directories (owner read/write/execute).
#[cfg(unix)]
pub const DEFAULT_DIR_PERMISSIONS: u32 = 0o700;
/// Default POSIX permissions for newly created files (owner read/write).
#[cfg(unix)]
pub const DEFAULT_FILE_PERMISSIONS: u32 = 0o600;

// Logging Configuration
/// Service name used in tracing spans and structured logs.
pub const TRACING_SERVICE_NAME: &str = "passcache";
/// Name for the root tracing span covering an application invocation.
pub const TRACING_ROOT_SPAN_NAME: &str = "app_invocation";
