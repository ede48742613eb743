//! MongoDB document store.

use std::future::Future;

use async_trait::async_trait;
use bson::doc;
use chrono::{DateTime, Utc};
use mongodb::options::{ClientOptions, ReplaceOptions};
use mongodb::{Client, Collection, Database, IndexModel};
use tracing::{debug, info};

use super::DocumentStore;
use crate::cache::Entry;
use crate::error::StoreError;

/// A [`DocumentStore`] backed by a MongoDB database.
///
/// Cloning is cheap and shares the underlying connection pool. The store never
/// closes the client; its lifetime belongs to whoever created it.
#[derive(Debug, Clone)]
pub struct MongoStore {
    client: Client,
    db: Database,
}

impl MongoStore {
    /// Connect to MongoDB with the given URI and database name.
    ///
    /// # Errors
    /// Returns error if the URI is invalid or the server does not answer a ping.
    pub async fn connect(uri: &str, db_name: &str) -> Result<Self, StoreError> {
        let options = ClientOptions::parse(uri).await?;
        let client = Client::with_options(options)?;

        client
            .database("admin")
            .run_command(doc! { "ping": 1 })
            .await?;

        info!("Successfully connected to MongoDB");

        let db = client.database(db_name);

        Ok(Self { client, db })
    }

    /// Wraps an already configured database handle.
    pub fn from_database(client: Client, db: Database) -> Self {
        Self { client, db }
    }

    pub fn client(&self) -> &Client {
        &self.client
    }

    pub fn database(&self) -> &Database {
        &self.db
    }

    /// Typed handle to a cache collection.
    pub fn collection(&self, name: &str) -> Collection<Entry> {
        self.db.collection(name)
    }

    /// Runs an ad-hoc query against `name`.
    ///
    /// Intended for diagnostics and tests that need to look past the cache API.
    pub async fn run_with_collection<T, F, Fut>(&self, name: &str, f: F) -> Result<T, StoreError>
    where
        F: FnOnce(Collection<Entry>) -> Fut,
        Fut: Future<Output = mongodb::error::Result<T>>,
    {
        Ok(f(self.collection(name)).await?)
    }

    /// Creates an ascending index on `expireAt` so sweeps avoid a collection scan.
    ///
    /// This is a plain index, not a MongoDB TTL index: several caches with
    /// different TTLs may share one collection.
    pub async fn ensure_expiry_index(&self, name: &str) -> Result<(), StoreError> {
        let index = IndexModel::builder().keys(doc! { "expireAt": 1 }).build();
        self.collection(name).create_index(index).await?;
        debug!("Ensured expireAt index on {}", name);
        Ok(())
    }
}

#[async_trait]
impl DocumentStore for MongoStore {
    async fn upsert(&self, collection: &str, entry: &Entry) -> Result<(), StoreError> {
        let filter = doc! { "_id": &entry.key };
        let options = ReplaceOptions::builder().upsert(true).build();

        self.collection(collection)
            .replace_one(filter, entry)
            .with_options(options)
            .await?;

        debug!("Upserted {} in {}", entry.key, collection);
        Ok(())
    }

    async fn find_one(&self, collection: &str, key: &str) -> Result<Option<Entry>, StoreError> {
        let filter = doc! { "_id": key };
        Ok(self.collection(collection).find_one(filter).await?)
    }

    async fn delete_one(&self, collection: &str, key: &str) -> Result<bool, StoreError> {
        let filter = doc! { "_id": key };
        let result = self.collection(collection).delete_one(filter).await?;
        Ok(result.deleted_count > 0)
    }

    async fn delete_expired(
        &self,
        collection: &str,
        cutoff: DateTime<Utc>,
    ) -> Result<u64, StoreError> {
        let filter = doc! { "expireAt": { "$lte": bson::DateTime::from_chrono(cutoff) } };
        let result = self.collection(collection).delete_many(filter).await?;
        Ok(result.deleted_count)
    }
}
