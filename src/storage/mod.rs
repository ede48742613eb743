//! Storage Module
//!
//! The document store abstraction the cache persists through, plus its MongoDB
//! and in-memory implementations.

mod memory;
mod mongo;

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::cache::Entry;
use crate::error::StoreError;

pub use memory::MemoryStore;
pub use mongo::MongoStore;

/// Durable document storage keyed by entry id, grouped into named collections.
///
/// Implementations are shared between every cache using them and between a
/// cache's foreground calls and its sweeper, so they must be `Send + Sync`.
#[async_trait]
pub trait DocumentStore: Send + Sync + 'static {
    /// Inserts the entry or replaces the document with the same key.
    async fn upsert(&self, collection: &str, entry: &Entry) -> Result<(), StoreError>;

    /// Point lookup by key. Does not look at expiry.
    async fn find_one(&self, collection: &str, key: &str) -> Result<Option<Entry>, StoreError>;

    /// Deletes the document for `key`, returning whether one existed.
    async fn delete_one(&self, collection: &str, key: &str) -> Result<bool, StoreError>;

    /// Deletes every document whose `expireAt <= cutoff`, returning the count.
    async fn delete_expired(
        &self,
        collection: &str,
        cutoff: DateTime<Utc>,
    ) -> Result<u64, StoreError>;
}
