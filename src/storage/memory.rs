//! In-process document store.
//!
//! Keeps entries in a map per collection. Used when no MongoDB URI is configured
//! and as the store behind most tests.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use parking_lot::RwLock;

use super::DocumentStore;
use crate::cache::Entry;
use crate::error::StoreError;

type Collection = HashMap<String, Entry>;

/// A [`DocumentStore`] that lives in memory.
#[derive(Debug, Default)]
pub struct MemoryStore {
    collections: RwLock<HashMap<String, Collection>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Runs `f` against a read-only view of `collection`.
    ///
    /// Missing collections are presented as empty.
    pub fn run_with_collection<T>(&self, collection: &str, f: impl FnOnce(&Collection) -> T) -> T {
        let collections = self.collections.read();
        match collections.get(collection) {
            Some(entries) => f(entries),
            None => f(&Collection::new()),
        }
    }

    /// Number of documents physically present in `collection`.
    pub fn len(&self, collection: &str) -> usize {
        self.run_with_collection(collection, |entries| entries.len())
    }

    pub fn is_empty(&self, collection: &str) -> bool {
        self.len(collection) == 0
    }
}

#[async_trait]
impl DocumentStore for MemoryStore {
    async fn upsert(&self, collection: &str, entry: &Entry) -> Result<(), StoreError> {
        self.collections
            .write()
            .entry(collection.to_string())
            .or_default()
            .insert(entry.key.clone(), entry.clone());
        Ok(())
    }

    async fn find_one(&self, collection: &str, key: &str) -> Result<Option<Entry>, StoreError> {
        Ok(self.run_with_collection(collection, |entries| entries.get(key).cloned()))
    }

    async fn delete_one(&self, collection: &str, key: &str) -> Result<bool, StoreError> {
        let mut collections = self.collections.write();
        Ok(collections
            .get_mut(collection)
            .and_then(|entries| entries.remove(key))
            .is_some())
    }

    async fn delete_expired(
        &self,
        collection: &str,
        cutoff: DateTime<Utc>,
    ) -> Result<u64, StoreError> {
        let mut collections = self.collections.write();
        let Some(entries) = collections.get_mut(collection) else {
            return Ok(0);
        };

        let before = entries.len();
        entries.retain(|_, entry| entry.expire_at > cutoff);
        Ok((before - entries.len()) as u64)
    }
}
