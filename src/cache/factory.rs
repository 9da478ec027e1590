//! Builds the HTTP cache selected by configuration.

use std::sync::Arc;

use tracing::info;

use crate::cache::{CacheEntryDao, FledgeHttpCache, HttpCache, NoOpCache};
use crate::config::Config;
use crate::db::Database;

/// Returns a persistent cache over `database`, or a [`NoOpCache`] when
/// caching is disabled.
pub fn create_cache(database: &Database, config: &Config) -> Arc<dyn HttpCache> {
    if !config.cache_enabled {
        info!("HTTP caching disabled, using no-op cache");
        return Arc::new(NoOpCache);
    }
    info!(
        "HTTP cache enabled: max_entries={}, default_max_age={}s",
        config.max_entries, config.default_max_age_seconds
    );
    Arc::new(FledgeHttpCache::new(
        CacheEntryDao::new(database.clone()),
        config.default_max_age_seconds,
        config.max_entries,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::ResponseHeaders;

    #[test]
    fn test_enabled_cache_persists() {
        let db = Database::open_in_memory().unwrap();
        let cache = create_cache(&db, &Config::default());

        cache.put("https://a.example", "body", &ResponseHeaders::new()).unwrap();

        assert_eq!(cache.cached_entries_count().unwrap(), 1);
    }

    #[test]
    fn test_disabled_cache_is_noop() {
        let db = Database::open_in_memory().unwrap();
        let config = Config {
            cache_enabled: false,
            ..Config::default()
        };
        let cache = create_cache(&db, &config);

        cache.put("https://a.example", "body", &ResponseHeaders::new()).unwrap();

        assert!(cache.get("https://a.example").unwrap().is_none());
        assert_eq!(CacheEntryDao::new(db).get_entries_count().unwrap(), 0);
    }
}
