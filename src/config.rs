//! Configuration Module
//!
//! Handles loading and managing service configuration from environment variables.

use std::env;
use std::time::Duration;

use crate::cache::{CacheOptions, DEFAULT_COLLECTION};

/// Service configuration parameters.
///
/// All values can be configured via environment variables with sensible defaults.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// MongoDB connection string; the in-memory store is used when unset
    pub mongodb_uri: Option<String>,
    /// MongoDB database name
    pub mongodb_database: String,
    /// Collection holding cache entries
    pub collection: String,
    /// Default TTL in seconds for entries without explicit TTL
    pub default_ttl: u64,
    /// Background sweep interval in seconds
    pub sweep_interval: u64,
    /// Whether the background sweep runs
    pub sweep_enabled: bool,
    /// HTTP server port
    pub server_port: u16,
}

impl Config {
    /// Creates a new Config by loading values from environment variables.
    ///
    /// A `.env` file in the working directory is loaded first if present.
    ///
    /// # Environment Variables
    /// - `MONGODB_URI` - MongoDB connection string (default: unset, in-memory store)
    /// - `MONGODB_DATABASE` - Database name (default: cache)
    /// - `CACHE_COLLECTION` - Collection name (default: cache_entries)
    /// - `DEFAULT_TTL` - Default TTL in seconds (default: 60)
    /// - `SWEEP_INTERVAL` - Sweep frequency in seconds (default: 60)
    /// - `SWEEP_ENABLED` - Run the background sweep (default: true)
    /// - `SERVER_PORT` - HTTP server port (default: 3000)
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();

        let defaults = Self::default();

        Self {
            mongodb_uri: env::var("MONGODB_URI").ok().filter(|v| !v.is_empty()),
            mongodb_database: env::var("MONGODB_DATABASE").unwrap_or(defaults.mongodb_database),
            collection: env::var("CACHE_COLLECTION").unwrap_or(defaults.collection),
            default_ttl: parse_var("DEFAULT_TTL").unwrap_or(defaults.default_ttl),
            sweep_interval: parse_var("SWEEP_INTERVAL").unwrap_or(defaults.sweep_interval),
            sweep_enabled: parse_var("SWEEP_ENABLED").unwrap_or(defaults.sweep_enabled),
            server_port: parse_var("SERVER_PORT").unwrap_or(defaults.server_port),
        }
    }

    /// Options for the cache store built from this configuration.
    pub fn cache_options(&self) -> CacheOptions {
        CacheOptions::default()
            .default_ttl(Duration::from_secs(self.default_ttl))
            .collection(self.collection.clone())
            .sweep_interval(Duration::from_secs(self.sweep_interval))
            .start_sweep(self.sweep_enabled)
    }
}

fn parse_var<T: std::str::FromStr>(name: &str) -> Option<T> {
    env::var(name).ok().and_then(|v| v.trim().parse().ok())
}

impl Default for Config {
    fn default() -> Self {
        Self {
            mongodb_uri: None,
            mongodb_database: "cache".to_string(),
            collection: DEFAULT_COLLECTION.to_string(),
            default_ttl: 60,
            sweep_interval: 60,
            sweep_enabled: true,
            server_port: 3000,
        }
    }
}
