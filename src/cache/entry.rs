//! Cache Entry Module
//!
//! Defines the persisted record for a single cache key.

use std::time::Duration;

use bson::serde_helpers::chrono_datetime_as_bson_datetime;
use bson::Bson;
use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::cache::policy;
use crate::error::StoreError;

// == Cache Entry ==
/// A cached value together with its timestamps.
///
/// Serialized as `{ _id, value, createdAt, expireAt }`. Both timestamps are
/// stored as BSON dates so the store can compare `expireAt` natively.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Entry {
    /// The cache key, used as the document id
    #[serde(rename = "_id")]
    pub key: String,
    /// The stored value
    pub value: Bson,
    /// Insertion time
    #[serde(rename = "createdAt", with = "chrono_datetime_as_bson_datetime")]
    pub created_at: DateTime<Utc>,
    /// Absolute expiration time
    #[serde(rename = "expireAt", with = "chrono_datetime_as_bson_datetime")]
    pub expire_at: DateTime<Utc>,
}

impl Entry {
    // == Constructor ==
    /// Creates an entry created at `now` that expires `ttl` later.
    pub fn new(key: impl Into<String>, value: Bson, now: DateTime<Utc>, ttl: Duration) -> Self {
        Self {
            key: key.into(),
            value,
            created_at: now,
            expire_at: policy::compute_expire_at(now, ttl),
        }
    }

    // == Is Expired ==
    /// Checks whether the entry is dead at `now`.
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        policy::is_expired(self, now)
    }

    // == Time To Live ==
    /// Returns the time left before expiry, zero once expired.
    pub fn ttl_remaining(&self, now: DateTime<Utc>) -> Duration {
        (self.expire_at - now).to_std().unwrap_or(Duration::ZERO)
    }

    // == Decode ==
    /// Decodes the stored value into `V`.
    pub fn decode_value<V: DeserializeOwned>(&self) -> Result<V, StoreError> {
        Ok(bson::from_bson(self.value.clone())?)
    }
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at(ms: i64) -> DateTime<Utc> {
        Utc.timestamp_millis_opt(ms).unwrap()
    }

    #[test]
    fn test_entry_creation() {
        let entry = Entry::new("k", Bson::String("v".into()), at(1_000), Duration::from_millis(500));

        assert_eq!(entry.key, "k");
        assert_eq!(entry.created_at, at(1_000));
        assert_eq!(entry.expire_at, at(1_500));
    }

    #[test]
    fn test_expiration_boundary_condition() {
        let entry = Entry::new("k", Bson::Null, at(0), Duration::from_millis(100));

        assert!(!entry.is_expired_at(at(99)));
        assert!(entry.is_expired_at(at(100)), "Entry should be expired at boundary");
        assert!(entry.is_expired_at(at(101)));
    }

    #[test]
    fn test_ttl_remaining() {
        let entry = Entry::new("k", Bson::Null, at(0), Duration::from_secs(10));

        assert_eq!(entry.ttl_remaining(at(4_000)), Duration::from_secs(6));
        assert_eq!(entry.ttl_remaining(at(10_000)), Duration::ZERO);
        assert_eq!(entry.ttl_remaining(at(20_000)), Duration::ZERO);
    }

    #[test]
    fn test_document_field_names() {
        let entry = Entry::new("k", Bson::Int32(7), at(0), Duration::from_secs(1));
        let doc = bson::to_document(&entry).unwrap();

        assert_eq!(doc.get_str("_id").unwrap(), "k");
        assert_eq!(doc.get_i32("value").unwrap(), 7);
        assert!(doc.get_datetime("createdAt").is_ok());
        assert_eq!(doc.get_datetime("expireAt").unwrap().timestamp_millis(), 1_000);

        let back: Entry = bson::from_document(doc).unwrap();
        assert_eq!(back, entry);
    }

    #[test]
    fn test_decode_value() {
        let entry = Entry::new("k", Bson::String("hello".into()), at(0), Duration::from_secs(1));

        let value: String = entry.decode_value().unwrap();
        assert_eq!(value, "hello");
        assert!(entry.decode_value::<i64>().is_err());
    }
}
