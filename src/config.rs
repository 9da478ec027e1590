//! Configuration Module
//!
//! Handles loading cache and storage configuration from environment variables.

use std::env;
use std::path::PathBuf;

/// Default cap on persisted HTTP cache rows.
pub const DEFAULT_MAX_ENTRIES: u64 = 100;
/// Default cache-wide max-age: two days.
pub const DEFAULT_MAX_AGE_SECONDS: u64 = 2 * 24 * 60 * 60;

/// Storage engine configuration parameters.
///
/// All values can be configured via environment variables with sensible defaults.
#[derive(Debug, Clone)]
pub struct Config {
    /// Whether HTTP responses are cached at all; `false` yields a no-op cache
    pub cache_enabled: bool,
    /// Maximum number of rows kept after a cleanup sweep
    pub max_entries: u64,
    /// Max-age in seconds stamped on new entries and used by cleanup sweeps
    pub default_max_age_seconds: u64,
    /// Background cleanup task interval in seconds
    pub cleanup_interval: u64,
    /// Location of the SQLite database file
    pub database_path: PathBuf,
}

impl Config {
    /// Creates a new Config by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `HTTP_CACHE_ENABLE` - Enable the HTTP cache (default: true)
    /// - `HTTP_CACHE_MAX_ENTRIES` - Maximum cache entries (default: 100)
    /// - `HTTP_CACHE_DEFAULT_MAX_AGE_SECONDS` - Default max-age (default: 172800)
    /// - `CLEANUP_INTERVAL` - Cleanup frequency in seconds (default: 3600)
    /// - `DATABASE_PATH` - SQLite database file (default: adstore.db)
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            cache_enabled: parse_env("HTTP_CACHE_ENABLE").unwrap_or(defaults.cache_enabled),
            max_entries: parse_env("HTTP_CACHE_MAX_ENTRIES").unwrap_or(defaults.max_entries),
            default_max_age_seconds: parse_env("HTTP_CACHE_DEFAULT_MAX_AGE_SECONDS")
                .unwrap_or(defaults.default_max_age_seconds),
            cleanup_interval: parse_env("CLEANUP_INTERVAL").unwrap_or(defaults.cleanup_interval),
            database_path: env::var("DATABASE_PATH")
                .ok()
                .map(PathBuf::from)
                .unwrap_or(defaults.database_path),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            cache_enabled: true,
            max_entries: DEFAULT_MAX_ENTRIES,
            default_max_age_seconds: DEFAULT_MAX_AGE_SECONDS,
            cleanup_interval: 3600,
            database_path: PathBuf::from("adstore.db"),
        }
    }
}

fn parse_env<T: std::str::FromStr>(key: &str) -> Option<T> {
    env::var(key).ok().and_then(|v| v.trim().parse().ok())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_default() {
        let config = Config::default();
        assert!(config.cache_enabled);
        assert_eq!(config.max_entries, 100);
        assert_eq!(config.default_max_age_seconds, 172_800);
        assert_eq!(config.cleanup_interval, 3600);
        assert_eq!(config.database_path, PathBuf::from("adstore.db"));
    }

    #[test]
    fn test_config_from_env() {
        // Single test touches the environment so parallel tests cannot race on it
        env::remove_var("HTTP_CACHE_ENABLE");
        env::remove_var("HTTP_CACHE_MAX_ENTRIES");
        env::remove_var("HTTP_CACHE_DEFAULT_MAX_AGE_SECONDS");
        env::remove_var("CLEANUP_INTERVAL");
        env::remove_var("DATABASE_PATH");

        let config = Config::from_env();
        assert!(config.cache_enabled);
        assert_eq!(config.max_entries, 100);
        assert_eq!(config.default_max_age_seconds, 172_800);

        env::set_var("HTTP_CACHE_ENABLE", "false");
        env::set_var("HTTP_CACHE_MAX_ENTRIES", "20");
        env::set_var("HTTP_CACHE_DEFAULT_MAX_AGE_SECONDS", "not-a-number");

        let config = Config::from_env();
        assert!(!config.cache_enabled);
        assert_eq!(config.max_entries, 20);
        assert_eq!(config.default_max_age_seconds, 172_800);

        env::remove_var("HTTP_CACHE_ENABLE");
        env::remove_var("HTTP_CACHE_MAX_ENTRIES");
        env::remove_var("HTTP_CACHE_DEFAULT_MAX_AGE_SECONDS");
    }
}
