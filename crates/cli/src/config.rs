//! Shell configuration, read from the environment.
//!
//! ```text
//! TSMERGE_SHARDS   comma-separated shard paths opened at startup (default: none)
//! TSMERGE_POINTS   print points under each series         (default: "true")
//! TSMERGE_LOG      tracing filter directive                (default: "warn")
//! ```

use std::path::PathBuf;

/// Reads a configuration value from the environment, falling back to `default`.
pub fn env_or(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Shards opened before the first command.
    pub shards: Vec<PathBuf>,
    /// Print every point under its series in `SERIES`.
    pub show_points: bool,
    /// `tracing` filter directive for the stderr logger.
    pub log_filter: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            shards: Vec::new(),
            show_points: true,
            log_filter: "warn".to_string(),
        }
    }
}

impl Config {
    /// Builds the config from `TSMERGE_*` variables. Unparseable values fall
    /// back to their defaults.
    pub fn from_env() -> Self {
        Self::from_values(
            &env_or("TSMERGE_SHARDS", ""),
            &env_or("TSMERGE_POINTS", "true"),
            &env_or("TSMERGE_LOG", "warn"),
        )
    }

    pub fn from_values(shards: &str, points: &str, log: &str) -> Self {
        let shards = shards
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(PathBuf::from)
            .collect();
        let log = log.trim();

        Self {
            shards,
            show_points: points.trim().parse().unwrap_or(true),
            log_filter: if log.is_empty() { "warn".to_string() } else { log.to_string() },
        }
    }
}
