//! Cache Module
//!
//! Persistent HTTP response cache with TTL expiry and FIFO eviction.

mod dao;
mod entry;
mod factory;
mod headers;
mod observer;
mod stats;
mod store;


// Re-export public types
pub use dao::CacheEntryDao;
pub use entry::{CacheEntry, ResponseHeaders};
pub use factory::create_cache;
pub use headers::{deserialize_response_headers, serialize_response_headers};
pub use observer::{CacheEventType, CacheObserver};
pub use stats::{CacheStats, StatsObserver};
pub use store::{FledgeHttpCache, HttpCache, NoOpCache};

// == Public Constants ==
/// Header inspected before storing a response
pub const CACHE_CONTROL: &str = "Cache-Control";

/// Directive that prevents a response from being cached
pub const NO_CACHE: &str = "no-cache";

/// Directive that prevents a response from being cached
pub const NO_STORE: &str = "no-store";
