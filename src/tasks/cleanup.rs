//! Cache Cleanup Task
//!
//! Background task that periodically sweeps expired entries and enforces the
//! cache size bound.

use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::cache::HttpCache;

/// Spawns a background task that periodically runs [`HttpCache::clean_up`].
///
/// The cleanup itself does blocking storage I/O, so each run is moved onto
/// tokio's blocking pool. A failed run is logged and the loop carries on with
/// the next interval.
///
/// # Arguments
/// * `cache` - Shared cache to maintain
/// * `cleanup_interval_secs` - Interval in seconds between cleanup runs
///
/// # Returns
/// A JoinHandle for the spawned task, which can be used to abort the task
/// during shutdown.
///
/// # Example
/// ```ignore
/// let cache = create_cache(&database, &config);
/// let cleanup_handle = spawn_cleanup_task(cache.clone(), config.cleanup_interval);
/// // Later, during shutdown:
/// cleanup_handle.abort();
/// ```
pub fn spawn_cleanup_task(cache: Arc<dyn HttpCache>, cleanup_interval_secs: u64) -> JoinHandle<()> {
    let interval = Duration::from_secs(cleanup_interval_secs.max(1));

    tokio::spawn(async move {
        info!(
            "Starting cache cleanup task with interval of {} seconds",
            interval.as_secs()
        );

        loop {
            tokio::time::sleep(interval).await;

            let cache = cache.clone();
            let outcome = tokio::task::spawn_blocking(move || {
                cache.clean_up()?;
                cache.cached_entries_count()
            })
            .await;

            match outcome {
                Ok(Ok(remaining)) => debug!("Cache cleanup done, {} entries remain", remaining),
                Ok(Err(err)) => warn!("Cache cleanup failed: {}", err),
                Err(err) => warn!("Cache cleanup task panicked: {}", err),
            }
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::{CacheEntryDao, FledgeHttpCache, ResponseHeaders};
    use crate::db::Database;

    fn cache(max_entries: u64) -> (Arc<dyn HttpCache>, Database) {
        let db = Database::open_in_memory().unwrap();
        let cache = FledgeHttpCache::new(CacheEntryDao::new(db.clone()), 3600, max_entries);
        (Arc::new(cache), db)
    }

    #[tokio::test]
    async fn test_cleanup_task_enforces_capacity() {
        let (cache, _db) = cache(2);
        for i in 0..5 {
            cache
                .put(&format!("https://a.example/{i}"), "body", &ResponseHeaders::new())
                .unwrap();
        }

        let handle = spawn_cleanup_task(cache.clone(), 1);
        tokio::time::sleep(Duration::from_millis(1500)).await;

        assert_eq!(cache.cached_entries_count().unwrap(), 2);
        assert!(cache.get("https://a.example/4").unwrap().is_some());

        handle.abort();
    }

    #[tokio::test]
    async fn test_cleanup_task_survives_failures() {
        let (cache, db) = cache(2);
        db.lock().execute_batch("DROP TABLE http_cache;").unwrap();

        let handle = spawn_cleanup_task(cache, 1);
        tokio::time::sleep(Duration::from_millis(2500)).await;

        assert!(!handle.is_finished(), "Task should keep running after a failed run");
        handle.abort();
    }

    #[tokio::test]
    async fn test_cleanup_task_can_be_aborted() {
        let (cache, _db) = cache(10);

        let handle = spawn_cleanup_task(cache, 1);
        handle.abort();

        tokio::time::sleep(Duration::from_millis(100)).await;
        assert!(handle.is_finished(), "Task should be finished after abort");
    }
}
