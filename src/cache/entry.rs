//! Cache Entry Module
//!
//! Defines one cached HTTP response together with its freshness metadata.

use std::collections::BTreeMap;

use chrono::{DateTime, Duration, Utc};

/// Header name to the ordered list of values received for it.
pub type ResponseHeaders = BTreeMap<String, Vec<String>>;

// == Cache Entry ==
/// A cached HTTP response, keyed by `url`.
///
/// Entries are replaced wholesale on a subsequent put for the same url; there
/// is no update in place.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheEntry {
    /// Cache key
    pub url: String,
    /// Response body as received
    pub response_body: String,
    /// Subset of response headers kept alongside the body
    pub response_headers: ResponseHeaders,
    /// When the entry was stored (millisecond precision)
    pub creation_timestamp: DateTime<Utc>,
    /// Freshness lifetime of this entry
    pub max_age_seconds: u64,
}

impl CacheEntry {
    // == Constructor ==
    /// Creates a new cache entry.
    ///
    /// `creation_timestamp` is truncated to milliseconds, the resolution the
    /// entry is persisted with, so that a stored entry reads back equal.
    pub fn new(
        url: impl Into<String>,
        response_body: impl Into<String>,
        response_headers: ResponseHeaders,
        creation_timestamp: DateTime<Utc>,
        max_age_seconds: u64,
    ) -> Self {
        Self {
            url: url.into(),
            response_body: response_body.into(),
            response_headers,
            creation_timestamp: truncate_to_millis(creation_timestamp),
            max_age_seconds,
        }
    }

    // == Expiry ==
    /// Last instant at which the entry is still served.
    pub fn expires_at(&self) -> DateTime<Utc> {
        self.creation_timestamp
            .checked_add_signed(max_age(self.max_age_seconds))
            .unwrap_or(DateTime::<Utc>::MAX_UTC)
    }

    /// Checks whether the entry is stale at `now`.
    ///
    /// An entry is fresh up to and including `creation_timestamp + max_age`.
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        self.expires_at() < now
    }

    // == Time To Live ==
    /// Remaining freshness at `now`, zero once expired.
    pub fn ttl_remaining_at(&self, now: DateTime<Utc>) -> Duration {
        let remaining = self.expires_at() - now;
        if remaining > Duration::zero() {
            remaining
        } else {
            Duration::zero()
        }
    }
}

// == Utility Functions ==
pub(crate) fn truncate_to_millis(instant: DateTime<Utc>) -> DateTime<Utc> {
    DateTime::from_timestamp_millis(instant.timestamp_millis()).unwrap_or(instant)
}

fn max_age(seconds: u64) -> Duration {
    i64::try_from(seconds)
        .ok()
        .and_then(Duration::try_seconds)
        .unwrap_or(Duration::MAX)
}
