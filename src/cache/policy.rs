//! Expiration Policy
//!
//! Pure functions deciding when an entry expires. The lazy check on `get` and the
//! background sweep both go through [`is_expired`] so they agree on the boundary.

use std::time::Duration;

use chrono::{DateTime, SubsecRound, TimeDelta, Utc};

use crate::cache::Entry;

/// Returns the current UTC time truncated to milliseconds, the resolution of a
/// BSON date.
pub fn now() -> DateTime<Utc> {
    Utc::now().trunc_subsecs(3)
}

/// Computes `now + ttl`, saturating at the maximum representable time.
///
/// A zero TTL yields an entry that is already expired.
pub fn compute_expire_at(now: DateTime<Utc>, ttl: Duration) -> DateTime<Utc> {
    TimeDelta::from_std(ttl)
        .ok()
        .and_then(|delta| now.checked_add_signed(delta))
        .unwrap_or(DateTime::<Utc>::MAX_UTC)
}

/// An entry expiring at exactly `now` is dead.
pub fn is_expired(entry: &Entry, now: DateTime<Utc>) -> bool {
    now >= entry.expire_at
}
