//! Expired Entry Purge Task
//!
//! Background task that periodically sweeps expired entries out of a store,
//! so memory is reclaimed even for keys that are never read again.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tokio::task::JoinHandle;
use tracing::{debug, info};

/// Stores that can drop all of their expired entries in one sweep.
#[async_trait]
pub trait ExpirationSweep: Send + Sync {
    /// Removes every expired entry and returns how many were dropped.
    async fn purge_expired(&self) -> usize;
}

/// Spawns a background task that periodically purges expired entries.
///
/// The task runs until aborted, sleeping for `interval` between sweeps.
///
/// # Arguments
/// * `store` - Shared reference to the store to sweep
/// * `interval` - Time between sweeps
///
/// # Returns
/// A JoinHandle for the spawned task, which can be used to abort the task
/// during shutdown.
///
/// # Example
/// ```ignore
/// let cache = Arc::new(MemoryCache::<String>::new());
/// let purge_handle = spawn_purge_task(cache.clone(), Duration::from_secs(1));
/// // Later, during shutdown:
/// purge_handle.abort();
/// ```
pub fn spawn_purge_task<S>(store: Arc<S>, interval: Duration) -> JoinHandle<()>
where
    S: ExpirationSweep + ?Sized + 'static,
{
    tokio::spawn(async move {
        info!("Starting expired entry purge task with interval of {:?}", interval);

        loop {
            tokio::time::sleep(interval).await;

            let removed = store.purge_expired().await;

            if removed > 0 {
                info!("Purge: removed {} expired entries", removed);
            } else {
                debug!("Purge: no expired entries found");
            }
        }
    })
}
