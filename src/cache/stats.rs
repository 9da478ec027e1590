//! Cache Statistics Module
//!
//! Tallies the events a cache reports to its observers.

use std::sync::atomic::{AtomicU64, Ordering};

use serde::Serialize;

use super::observer::{CacheEventType, CacheObserver};

// == Cache Stats ==
/// Point-in-time event counts.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CacheStats {
    /// Number of responses persisted
    pub puts: u64,
    /// Number of lookups, hit or miss
    pub gets: u64,
    /// Number of cleanup sweeps
    pub cleanups: u64,
    /// Number of full cache wipes
    pub deletes: u64,
}

impl CacheStats {
    // == Total ==
    /// Total number of events observed.
    pub fn total(&self) -> u64 {
        self.puts + self.gets + self.cleanups + self.deletes
    }
}

// == Stats Observer ==
/// Observer that counts every event it receives.
#[derive(Debug, Default)]
pub struct StatsObserver {
    puts: AtomicU64,
    gets: AtomicU64,
    cleanups: AtomicU64,
    deletes: AtomicU64,
}

impl StatsObserver {
    pub fn new() -> Self {
        Self::default()
    }

    // == Snapshot ==
    /// Returns the counts observed so far.
    pub fn snapshot(&self) -> CacheStats {
        CacheStats {
            puts: self.puts.load(Ordering::Relaxed),
            gets: self.gets.load(Ordering::Relaxed),
            cleanups: self.cleanups.load(Ordering::Relaxed),
            deletes: self.deletes.load(Ordering::Relaxed),
        }
    }
}

impl CacheObserver for StatsObserver {
    fn update(&self, event: CacheEventType) {
        let counter = match event {
            CacheEventType::Put => &self.puts,
            CacheEventType::Get => &self.gets,
            CacheEventType::Cleanup => &self.cleanups,
            CacheEventType::Delete => &self.deletes,
        };
        counter.fetch_add(1, Ordering::Relaxed);
    }
}
