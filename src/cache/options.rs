//! Cache options.

use std::time::Duration;

use crate::error::{CacheError, Result};

/// Default time-to-live for entries set without an explicit TTL
pub const DEFAULT_TTL: Duration = Duration::from_secs(60);

/// Default collection holding cache entries
pub const DEFAULT_COLLECTION: &str = "cache_entries";

/// Default period between background expiry sweeps
pub const DEFAULT_SWEEP_INTERVAL: Duration = Duration::from_secs(60);

/// Configuration for a [`CacheStore`](crate::cache::CacheStore).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheOptions {
    /// TTL applied by `set`.
    pub default_ttl: Duration,

    /// Collection (namespace) inside the document store.
    pub collection: String,

    /// Period between sweeps.
    pub sweep_interval: Duration,

    /// Start sweeping as soon as the store is built.
    pub start_sweep: bool,
}

impl Default for CacheOptions {
    fn default() -> Self {
        Self {
            default_ttl: DEFAULT_TTL,
            collection: DEFAULT_COLLECTION.to_string(),
            sweep_interval: DEFAULT_SWEEP_INTERVAL,
            start_sweep: false,
        }
    }
}

impl CacheOptions {
    /// Set the default TTL.
    #[must_use]
    pub fn default_ttl(mut self, ttl: Duration) -> Self {
        self.default_ttl = ttl;
        self
    }

    /// Set the collection name.
    #[must_use]
    pub fn collection(mut self, name: impl Into<String>) -> Self {
        self.collection = name.into();
        self
    }

    /// Set the sweep interval.
    #[must_use]
    pub fn sweep_interval(mut self, interval: Duration) -> Self {
        self.sweep_interval = interval;
        self
    }

    /// Start the sweeper at construction time.
    #[must_use]
    pub fn start_sweep(mut self, enabled: bool) -> Self {
        self.start_sweep = enabled;
        self
    }

    /// Rejects zero durations and collection names MongoDB would refuse.
    pub fn validate(&self) -> Result<()> {
        if self.default_ttl.is_zero() {
            return Err(CacheError::InvalidConfig(
                "default TTL must be greater than zero".to_string(),
            ));
        }

        if self.sweep_interval.is_zero() {
            return Err(CacheError::InvalidConfig(
                "sweep interval must be greater than zero".to_string(),
            ));
        }

        if self.collection.is_empty() {
            return Err(CacheError::InvalidConfig(
                "collection name cannot be empty".to_string(),
            ));
        }

        if self.collection.contains(['$', '\0']) || self.collection.starts_with("system.") {
            return Err(CacheError::InvalidConfig(format!(
                "invalid collection name '{}'",
                self.collection
            )));
        }

        Ok(())
    }
}
