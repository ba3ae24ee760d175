//! Configuration management for the passcache application.
//!
//! This module handles loading and validating configuration settings from environment
//! variables, with sensible defaults. The resulting [`Config`] is passed explicitly to
//! the cache; nothing is stored in process-wide state.
//!
//! # Environment Variables
//!
//! - `PASSCACHE_FILE`: Path to the cache file (defaults to ~/.passcache/passphrase.cache)
//! - `PASSCACHE_TTL`: Cache lifetime in seconds (defaults to 1800)
//! - `HOME`: Used for expanding the default cache file path

use crate::cache::CacheSettings;
use crate::constants::{
    DEFAULT_CACHE_SUBPATH, DEFAULT_CACHE_TTL_SECS, ENV_VAR_HOME, ENV_VAR_PASSCACHE_FILE,
    ENV_VAR_PASSCACHE_TTL,
};
use crate::errors::{AppError, AppResult};
use std::env;
use std::fmt;
use std::path::PathBuf;
use std::time::Duration;

/// Configuration for the passcache application.
///
/// # Examples
///
/// Creating a configuration manually:
/// ```
/// use passcache::Config;
/// use std::path::PathBuf;
/// use std::time::Duration;
///
/// let config = Config {
///     cache_path: PathBuf::from("/tmp/passphrase.cache"),
///     ttl: Duration::from_secs(600),
/// };
/// assert!(config.validate().is_ok());
/// ```
///
/// Loading configuration from environment variables:
/// ```no_run
/// use passcache::Config;
/// use std::env;
///
/// env::set_var("PASSCACHE_FILE", "~/.cache/passcache/passphrase.cache");
/// env::set_var("PASSCACHE_TTL", "900");
///
/// let config = Config::load().expect("Failed to load configuration");
/// assert_eq!(config.ttl.as_secs(), 900);
/// ```
#[derive(Clone, PartialEq, Eq)]
pub struct Config {
    /// Location of the encrypted cache file.
    ///
    /// Loaded from `PASSCACHE_FILE`, falling back to `~/.passcache/passphrase.cache`.
    pub cache_path: PathBuf,

    /// How long a cached passphrase stays valid.
    ///
    /// Loaded from `PASSCACHE_TTL` (seconds), falling back to 30 minutes.
    pub ttl: Duration,
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("cache_path", &"[REDACTED_PATH]")
            .field("ttl", &self.ttl)
            .finish()
    }
}

impl Default for Config {
    /// Creates a new Config with default values.
    fn default() -> Self {
        Config {
            cache_path: PathBuf::from(""),
            ttl: Duration::from_secs(DEFAULT_CACHE_TTL_SECS),
        }
    }
}

impl Config {
    /// Parses a TTL given in whole seconds.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Config` if the value is not a positive integer.
    pub fn parse_ttl(value: &str) -> AppResult<Duration> {
        let seconds: u64 = value.trim().parse().map_err(|_| {
            AppError::Config(format!(
                "Cache TTL must be a whole number of seconds, got '{}'",
                value
            ))
        })?;

        if seconds == 0 {
            return Err(AppError::Config(
                "Cache TTL must be greater than zero".to_string(),
            ));
        }

        Ok(Duration::from_secs(seconds))
    }

    /// Expands `~` and environment variable references in a path.
    pub fn expand_path(raw: &str) -> AppResult<PathBuf> {
        let expanded = shellexpand::full(raw)
            .map_err(|e| AppError::Config(format!("Failed to expand path: {}", e)))?;
        Ok(PathBuf::from(expanded.into_owned()))
    }

    /// Loads configuration from environment variables with sensible defaults.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Config` if:
    /// - The cache path expansion fails or yields an empty path
    /// - `PASSCACHE_FILE` and `HOME` are both unset
    /// - `PASSCACHE_TTL` is not a positive whole number of seconds
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use passcache::Config;
    ///
    /// match Config::load() {
    ///     Ok(config) => println!("Cache lifetime: {:?}", config.ttl),
    ///     Err(err) => eprintln!("Failed to load config: {}", err),
    /// }
    /// ```
    pub fn load() -> AppResult<Self> {
        Config::load_with(None, None)
    }

    /// Loads configuration, letting explicit values take precedence over the
    /// environment.
    ///
    /// An environment variable is not read at all when its override is given,
    /// so a malformed `PASSCACHE_TTL` does not block `--ttl`.
    ///
    /// # Errors
    ///
    /// Same as [`Config::load`], plus `AppError::Config` if the default path is
    /// needed and `HOME` is not set.
    pub fn load_with(cache_file: Option<&str>, ttl: Option<Duration>) -> AppResult<Self> {
        let cache_path_str = match cache_file {
            Some(path) => path.to_string(),
            None => match env::var(ENV_VAR_PASSCACHE_FILE) {
                Ok(path) => path,
                Err(_) => {
                    let home = env::var(ENV_VAR_HOME)
                        .ok()
                        .filter(|home| !home.is_empty())
                        .ok_or_else(|| {
                            AppError::Config(format!(
                                "{} is not set; set {} to choose a cache file",
                                ENV_VAR_HOME, ENV_VAR_PASSCACHE_FILE
                            ))
                        })?;
                    format!("{}/{}", home, DEFAULT_CACHE_SUBPATH)
                }
            },
        };

        let cache_path = Config::expand_path(&cache_path_str)?;
        if cache_path.as_os_str().is_empty() {
            return Err(AppError::Config("Cache file path is empty".to_string()));
        }

        let ttl = match ttl {
            Some(ttl) => ttl,
            None => match env::var(ENV_VAR_PASSCACHE_TTL) {
                Ok(value) => Config::parse_ttl(&value)?,
                Err(_) => Duration::from_secs(DEFAULT_CACHE_TTL_SECS),
            },
        };

        Ok(Config { cache_path, ttl })
    }

    /// Validates that the configuration is usable.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Config` with one of the following messages:
    /// - "Cache file path is empty"
    /// - "Cache file path must be absolute"
    /// - "Cache TTL must be greater than zero"
    ///
    /// # Examples
    ///
    /// ```
    /// use passcache::Config;
    /// use std::path::PathBuf;
    /// use std::time::Duration;
    ///
    /// let invalid_config = Config {
    ///     cache_path: PathBuf::from("relative/passphrase.cache"),
    ///     ttl: Duration::from_secs(60),
    /// };
    /// assert!(invalid_config.validate().is_err());
    /// ```
    pub fn validate(&self) -> AppResult<()> {
        if self.cache_path.as_os_str().is_empty() {
            return Err(AppError::Config("Cache file path is empty".to_string()));
        }

        if !self.cache_path.is_absolute() {
            return Err(AppError::Config(
                "Cache file path must be absolute".to_string(),
            ));
        }

        if self.ttl.is_zero() {
            return Err(AppError::Config(
                "Cache TTL must be greater than zero".to_string(),
            ));
        }

        Ok(())
    }

    /// Settings handed to [`PassphraseCache`](crate::cache::PassphraseCache).
    pub fn cache_settings(&self) -> CacheSettings {
        CacheSettings {
            path: self.cache_path.clone(),
            ttl: self.ttl,
        }
    }
}
