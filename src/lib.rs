//! adstore - HTTP response cache and versioned configuration store
//!
//! Provides a persistent HTTP cache with TTL expiry and FIFO eviction, and a
//! versioned, label-filtered configuration store, both over one SQLite handle.

pub mod cache;
pub mod clock;
pub mod config;
pub mod config_delivery;
pub mod db;
pub mod error;
pub mod tasks;

pub use cache::{create_cache, CacheEntry, FledgeHttpCache, HttpCache, NoOpCache};
pub use config::Config;
pub use config_delivery::ConfigurationDao;
pub use db::Database;
pub use error::{Result, StoreError};
pub use tasks::spawn_cleanup_task;
