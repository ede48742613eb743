//! Cache Module
//!
//! TTL cache entries, the expiration policy, and the store that applies it on
//! top of a document store.

mod entry;
mod options;
pub mod policy;
mod stats;
mod store;


// Re-export public types
pub use entry::Entry;
pub use options::{CacheOptions, DEFAULT_COLLECTION, DEFAULT_SWEEP_INTERVAL, DEFAULT_TTL};
pub use stats::CacheStats;
pub use store::CacheStore;

pub(crate) use store::CacheCore;

// == Public Constants ==
/// Maximum allowed key length in bytes
pub const MAX_KEY_LENGTH: usize = 256;
