//! Cache Store Module
//!
//! Main cache engine: reads and writes go through a [`DocumentStore`], expired
//! entries are hidden and removed on read, and an optional [`Sweeper`] removes
//! them in bulk.

use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex as SyncMutex;
use serde::de::DeserializeOwned;
use serde::Serialize;
use tokio::sync::Mutex;
use tracing::{debug, warn};

use crate::cache::{policy, CacheOptions, CacheStats, Entry};
use crate::error::{CacheError, Result, StoreError};
use crate::storage::DocumentStore;
use crate::tasks::{SweepState, Sweeper};

// == Cache Core ==
/// State shared between a [`CacheStore`] and its sweeper task.
pub(crate) struct CacheCore {
    store: Arc<dyn DocumentStore>,
    options: CacheOptions,
    /// The single exclusive lock; every operation holds it across the store call.
    state: Mutex<CacheStats>,
}

impl CacheCore {
    // == Sweep Expired ==
    /// Deletes every entry expired at the current time, under the lock.
    pub(crate) async fn sweep_expired(&self) -> std::result::Result<u64, StoreError> {
        let mut stats = self.state.lock().await;
        match self
            .store
            .delete_expired(&self.options.collection, policy::now())
            .await
        {
            Ok(removed) => {
                stats.record_sweep(removed);
                Ok(removed)
            }
            Err(e) => {
                stats.record_sweep_failure();
                Err(e)
            }
        }
    }

    pub(crate) fn collection(&self) -> &str {
        &self.options.collection
    }
}

// == Cache Store ==
/// TTL cache persisted in a document store.
///
/// All operations are serialized by one lock, including sweep ticks, so a read
/// never races a concurrent sweep or write.
pub struct CacheStore {
    core: Arc<CacheCore>,
    sweep: SyncMutex<SweepState>,
}

impl CacheStore {
    // == Constructor ==
    /// Creates a cache over `store` after validating `options`.
    ///
    /// The store handle is shared; dropping the cache does not close it.
    ///
    /// # Errors
    /// `InvalidConfig` if the options are invalid, or if `start_sweep` is set
    /// outside of a Tokio runtime.
    pub fn new(store: Arc<dyn DocumentStore>, options: CacheOptions) -> Result<Self> {
        options.validate()?;

        if options.start_sweep && tokio::runtime::Handle::try_current().is_err() {
            return Err(CacheError::InvalidConfig(
                "start_sweep requires a Tokio runtime".to_string(),
            ));
        }

        let cache = Self {
            core: Arc::new(CacheCore {
                store,
                options,
                state: Mutex::new(CacheStats::new()),
            }),
            sweep: SyncMutex::new(SweepState::Idle),
        };

        if cache.core.options.start_sweep {
            cache.start_sweep(cache.core.options.sweep_interval);
        }

        Ok(cache)
    }

    // == Get ==
    /// Retrieves and decodes the value stored under `key`.
    ///
    /// Expired entries are reported as `NotFound` whether or not a sweep has
    /// removed them yet.
    pub async fn get<V: DeserializeOwned>(&self, key: &str) -> Result<V> {
        let entry = self.get_entry(key).await?;
        Ok(entry.decode_value()?)
    }

    /// Retrieves the live entry stored under `key`.
    pub async fn get_entry(&self, key: &str) -> Result<Entry> {
        let mut stats = self.core.state.lock().await;
        let collection = self.core.collection();

        let Some(entry) = self.core.store.find_one(collection, key).await? else {
            stats.record_miss();
            return Err(CacheError::NotFound(key.to_string()));
        };

        if entry.is_expired_at(policy::now()) {
            if let Err(e) = self.core.store.delete_one(collection, key).await {
                debug!("Failed to remove expired key {}: {}", key, e);
            }
            stats.record_lazy_expiration();
            return Err(CacheError::NotFound(key.to_string()));
        }

        stats.record_hit();
        Ok(entry)
    }

    // == Set ==
    /// Stores `value` under `key` with the default TTL.
    pub async fn set<V: Serialize + ?Sized>(&self, key: &str, value: &V) -> Result<()> {
        self.set_with_ttl(key, value, self.core.options.default_ttl)
            .await
    }

    /// Stores `value` under `key`, replacing any previous entry and resetting its
    /// expiry to `ttl` from now.
    pub async fn set_with_ttl<V: Serialize + ?Sized>(
        &self,
        key: &str,
        value: &V,
        ttl: Duration,
    ) -> Result<()> {
        let value = bson::to_bson(value).map_err(StoreError::from)?;

        let _guard = self.core.state.lock().await;
        let entry = Entry::new(key, value, policy::now(), ttl);
        self.core.store.upsert(self.core.collection(), &entry).await?;

        debug!("Set {} (expires {})", key, entry.expire_at);
        Ok(())
    }

    // == Delete ==
    /// Removes `key`. Deleting a missing key succeeds.
    pub async fn delete(&self, key: &str) -> Result<()> {
        let _guard = self.core.state.lock().await;
        let existed = self.core.store.delete_one(self.core.collection(), key).await?;
        debug!("Delete {}: existed={}", key, existed);
        Ok(())
    }

    // == Sweep ==
    /// Runs one bulk expiry delete now and returns the number removed.
    pub async fn sweep_now(&self) -> Result<u64> {
        Ok(self.core.sweep_expired().await?)
    }

    /// Starts the background sweeper, replacing a running one.
    ///
    /// A zero interval is ignored. Outside a Tokio runtime this logs a warning
    /// and leaves sweeping off.
    pub fn start_sweep(&self, interval: Duration) {
        if interval.is_zero() {
            return;
        }

        if tokio::runtime::Handle::try_current().is_err() {
            warn!("Cannot start sweeper outside of a Tokio runtime");
            return;
        }

        let mut sweep = self.sweep.lock();
        if let SweepState::Running(previous) = std::mem::take(&mut *sweep) {
            previous.stop();
        }
        *sweep = SweepState::Running(Sweeper::spawn(Arc::clone(&self.core), interval));
    }

    /// Signals the sweeper to stop without waiting for it.
    ///
    /// A sweep already in progress may finish after this returns. The document
    /// store is left open.
    pub fn stop_sweep(&self) {
        if let SweepState::Running(sweeper) = std::mem::take(&mut *self.sweep.lock()) {
            sweeper.stop();
        }
    }

    /// Returns true while a sweeper is running.
    pub fn is_sweeping(&self) -> bool {
        matches!(*self.sweep.lock(), SweepState::Running(_))
    }

    // == Accessors ==
    /// The validated options this cache was built with.
    pub fn options(&self) -> &CacheOptions {
        &self.core.options
    }

    #[cfg(test)]
    pub(crate) fn core(&self) -> &Arc<CacheCore> {
        &self.core
    }

    /// Returns a snapshot of the counters.
    pub async fn stats(&self) -> CacheStats {
        self.core.state.lock().await.clone()
    }
}

impl Drop for CacheStore {
    fn drop(&mut self) {
        self.stop_sweep();
    }
}

impl std::fmt::Debug for CacheStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CacheStore")
            .field("options", &self.core.options)
            .field("sweeping", &self.is_sweeping())
            .finish()
    }
}
