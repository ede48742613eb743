//! Mongo TTL Cache - a key-value cache persisted in MongoDB
//!
//! Entries expire after a TTL. Expired entries are hidden and removed on read,
//! and an optional background sweeper deletes them in bulk.

pub mod api;
pub mod cache;
pub mod config;
pub mod error;
pub mod models;
pub mod storage;
pub mod tasks;

pub use api::AppState;
pub use cache::{CacheOptions, CacheStore, Entry};
pub use config::Config;
pub use error::{CacheError, StoreError};
pub use storage::{DocumentStore, MemoryStore, MongoStore};
