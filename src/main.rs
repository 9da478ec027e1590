//! adstore maintenance daemon
//!
//! Opens the shared store and keeps the HTTP cache bounded until shut down.

use std::sync::Arc;

use tokio::signal;
use tracing::{error, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use adstore::cache::StatsObserver;
use adstore::{create_cache, spawn_cleanup_task, Config, Database};

/// Main entry point for the maintenance daemon.
///
/// # Startup Sequence
/// 1. Initialize tracing subscriber for logging
/// 2. Load configuration from environment variables
/// 3. Open the database and build the HTTP cache
/// 4. Start the background cleanup task
/// 5. Wait for SIGINT/SIGTERM, then stop the task and report statistics
#[tokio::main]
async fn main() {
    // Defaults to "info" level, can be overridden with RUST_LOG env var
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "adstore=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting adstore maintenance daemon");

    let config = Config::from_env();
    info!(
        "Configuration loaded: cache_enabled={}, max_entries={}, default_max_age={}s, \
         cleanup_interval={}s, database={}",
        config.cache_enabled,
        config.max_entries,
        config.default_max_age_seconds,
        config.cleanup_interval,
        config.database_path.display()
    );

    let database = match Database::open(&config.database_path) {
        Ok(database) => database,
        Err(err) => {
            error!("Failed to open database: {}", err);
            std::process::exit(1);
        }
    };

    let cache = create_cache(&database, &config);
    let stats = Arc::new(StatsObserver::new());
    cache.add_observer(stats.clone());

    let cleanup_handle = spawn_cleanup_task(cache.clone(), config.cleanup_interval);
    info!("Background cleanup task started");

    shutdown_signal().await;

    cleanup_handle.abort();
    warn!("Cleanup task aborted");

    match cache.cached_entries_count() {
        Ok(count) => info!("Cache holds {} entries at shutdown", count),
        Err(err) => warn!("Could not count cache entries: {}", err),
    }
    info!("Cache events: {:?}", stats.snapshot());
    info!("Shutdown complete");
}

/// Waits for shutdown signal (Ctrl+C or SIGTERM).
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = signal::ctrl_c().await {
            error!("Failed to listen for Ctrl+C: {}", err);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(err) => {
                error!("Failed to install SIGTERM handler: {}", err);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C, initiating shutdown...");
        }
        _ = terminate => {
            info!("Received SIGTERM, initiating shutdown...");
        }
    }
}
