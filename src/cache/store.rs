//! HTTP Cache Module
//!
//! Cache policy on top of [`CacheEntryDao`]: honors `Cache-Control`
//! directives, serves fresh entries, and keeps the table bounded with TTL
//! sweeps and FIFO pruning.

use std::sync::Arc;

use tracing::debug;

use crate::cache::observer::ObserverList;
use crate::cache::{
    CacheEntry, CacheEntryDao, CacheEventType, CacheObserver, ResponseHeaders, CACHE_CONTROL,
    NO_CACHE, NO_STORE,
};
use crate::clock::{Clock, SystemClock};
use crate::error::Result;

// == Http Cache Trait ==
/// Cache for HTTP responses keyed by url.
///
/// Storage failures are returned to the caller untouched; a failed operation
/// has not taken effect and fires no event.
pub trait HttpCache: Send + Sync {
    /// Returns the cached response for `url` if it is still fresh.
    fn get(&self, url: &str) -> Result<Option<CacheEntry>>;

    /// Stores a response unless its headers forbid caching.
    fn put(&self, url: &str, body: &str, response_headers: &ResponseHeaders) -> Result<()>;

    /// Number of stored entries, including stale ones awaiting cleanup.
    fn cached_entries_count(&self) -> Result<u64>;

    /// Drops expired entries, then evicts the oldest down to the size bound.
    fn clean_up(&self) -> Result<()>;

    /// Removes every entry.
    fn delete(&self) -> Result<()>;

    fn add_observer(&self, observer: Arc<dyn CacheObserver>);
}

// == Fledge Http Cache ==
/// Persistent cache used for auction script and signal fetches.
#[derive(Debug)]
pub struct FledgeHttpCache {
    dao: CacheEntryDao,
    clock: Arc<dyn Clock>,
    /// Stamped on new entries and used by cleanup sweeps
    max_age_seconds: u64,
    /// Size bound enforced by cleanup
    max_entries: u64,
    observers: ObserverList,
}

impl FledgeHttpCache {
    // == Constructor ==
    /// Creates a cache backed by `dao` using wall-clock time.
    ///
    /// # Arguments
    /// * `dao` - Persistence for cache rows
    /// * `max_age_seconds` - Cache-wide max-age; should cover the longest legitimate entry TTL
    /// * `max_entries` - Number of rows kept after `clean_up`
    pub fn new(dao: CacheEntryDao, max_age_seconds: u64, max_entries: u64) -> Self {
        Self::with_clock(dao, max_age_seconds, max_entries, Arc::new(SystemClock))
    }

    /// Same as [`FledgeHttpCache::new`] with an explicit time source.
    pub fn with_clock(
        dao: CacheEntryDao,
        max_age_seconds: u64,
        max_entries: u64,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            dao,
            clock,
            max_age_seconds,
            max_entries,
            observers: ObserverList::default(),
        }
    }

    pub fn max_age_seconds(&self) -> u64 {
        self.max_age_seconds
    }

    pub fn max_entries(&self) -> u64 {
        self.max_entries
    }
}

impl HttpCache for FledgeHttpCache {
    // == Get ==
    fn get(&self, url: &str) -> Result<Option<CacheEntry>> {
        let now = self.clock.now();
        let entry = self.dao.get_entry(url, now)?;
        match &entry {
            Some(hit) => debug!(
                "Cache hit for url: {} ({}s fresh)",
                url,
                hit.ttl_remaining_at(now).num_seconds()
            ),
            None => debug!("Cache miss for url: {}", url),
        }
        // Fires on every lookup, hit or miss
        self.observers.notify(CacheEventType::Get);
        Ok(entry)
    }

    // == Put ==
    fn put(&self, url: &str, body: &str, response_headers: &ResponseHeaders) -> Result<()> {
        if !is_caching_permitted(response_headers) {
            debug!("Skipping cache for url: {} (Cache-Control forbids storing)", url);
            return Ok(());
        }

        let entry = CacheEntry::new(
            url,
            body,
            response_headers.clone(),
            self.clock.now(),
            self.max_age_seconds,
        );
        self.dao.persist(&entry)?;
        debug!("Cached response for url: {}", url);
        self.observers.notify(CacheEventType::Put);
        Ok(())
    }

    // == Count ==
    fn cached_entries_count(&self) -> Result<u64> {
        self.dao.get_entries_count()
    }

    // == Clean Up ==
    fn clean_up(&self) -> Result<()> {
        let expired = self.dao.delete_expired(self.max_age_seconds, self.clock.now())?;
        let evicted = self.dao.prune(self.max_entries)?;
        debug!(
            "Cache cleanup removed {} expired and {} evicted entries",
            expired, evicted
        );
        self.observers.notify(CacheEventType::Cleanup);
        Ok(())
    }

    // == Delete ==
    fn delete(&self) -> Result<()> {
        let removed = self.dao.delete_all()?;
        debug!("Cache cleared, {} entries removed", removed);
        self.observers.notify(CacheEventType::Delete);
        Ok(())
    }

    fn add_observer(&self, observer: Arc<dyn CacheObserver>) {
        self.observers.add(observer);
    }
}

/// `false` when any `Cache-Control` value is exactly `no-cache` or `no-store`.
fn is_caching_permitted(response_headers: &ResponseHeaders) -> bool {
    response_headers
        .get(CACHE_CONTROL)
        .map_or(true, |values| !values.iter().any(|v| v == NO_CACHE || v == NO_STORE))
}

// == No-op Cache ==
/// Cache used when HTTP caching is disabled: stores nothing, always misses,
/// never notifies.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoOpCache;

impl HttpCache for NoOpCache {
    fn get(&self, _url: &str) -> Result<Option<CacheEntry>> {
        Ok(None)
    }

    fn put(&self, _url: &str, _body: &str, _response_headers: &ResponseHeaders) -> Result<()> {
        Ok(())
    }

    fn cached_entries_count(&self) -> Result<u64> {
        Ok(0)
    }

    fn clean_up(&self) -> Result<()> {
        Ok(())
    }

    fn delete(&self) -> Result<()> {
        Ok(())
    }

    fn add_observer(&self, _observer: Arc<dyn CacheObserver>) {}
}
