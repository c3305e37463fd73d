//! Memory Cache Module
//!
//! TTL cache over the shared entry map, with capacity-triggered cleanup.

use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;
use tracing::debug;

use crate::cache::map::{EntryMap, Lookup};
use crate::cache::{Cache, CacheStats, DEFAULT_MAX_SIZE, DEFAULT_TIMEOUT_MS};
use crate::clock::{Clock, SystemClock};
use crate::config::{CacheConfig, ConfigParams, Configurable, MAX_SIZE_KEY, TIMEOUT_KEY};
use crate::context::{trace_of, Context};
use crate::error::{check_key, Result};
use crate::tasks::ExpirationSweep;

// == Memory Cache ==
/// In-memory cache with lazy expiration and bounded size.
///
/// Reads drop entries they find expired. When a store pushes the live count
/// above `max_size`, one cleanup pass removes every expired entry and, if
/// still over capacity, the single entry closest to expiring.
///
/// ```
/// # tokio_test::block_on(async {
/// use memstate::{Cache, MemoryCache};
///
/// let cache = MemoryCache::new();
/// cache.store(None, "greeting", Some("hello"), 0).await?;
/// assert_eq!(cache.retrieve(None, "greeting").await?, Some("hello"));
/// # Ok::<(), memstate::CacheError>(())
/// # }).unwrap();
/// ```
#[derive(Debug)]
pub struct MemoryCache<V> {
    inner: RwLock<EntryMap<V>>,
    /// Default TTL in milliseconds
    timeout: i64,
    /// Soft cap on live entries, 0 disables cleanup
    max_size: usize,
    clock: Arc<dyn Clock>,
}

impl<V: Clone + Send + Sync> MemoryCache<V> {
    // == Constructor ==
    /// Creates a cache with a 60 second default timeout and room for 1000 entries.
    pub fn new() -> Self {
        Self {
            inner: RwLock::new(EntryMap::new()),
            timeout: DEFAULT_TIMEOUT_MS,
            max_size: DEFAULT_MAX_SIZE,
            clock: Arc::new(SystemClock),
        }
    }

    /// Creates a cache from typed settings.
    pub fn from_config(config: &CacheConfig) -> Self {
        let mut cache = Self::new();
        cache.configure(&config.to_params());
        cache
    }

    /// Replaces the time source.
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    pub fn timeout(&self) -> i64 {
        self.timeout
    }

    pub fn max_size(&self) -> usize {
        self.max_size
    }

    // == Length ==
    /// Returns the current number of entries, expired ones included until observed.
    pub async fn len(&self) -> usize {
        self.inner.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }

    // == Stats ==
    /// Returns a snapshot of the cache counters.
    pub async fn stats(&self) -> CacheStats {
        self.inner.read().await.stats()
    }

    /// Drops every entry.
    pub async fn clear(&self) {
        self.inner.write().await.clear();
    }

    fn effective_timeout(&self, timeout_ms: i64) -> i64 {
        let timeout = if timeout_ms > 0 { timeout_ms } else { self.timeout };
        timeout.max(0)
    }
}

impl<V: Clone + Send + Sync> Default for MemoryCache<V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V> Configurable for MemoryCache<V> {
    fn configure(&mut self, config: &ConfigParams) {
        self.timeout = config.get_as_long_with_default(TIMEOUT_KEY, self.timeout);
        // Any non-positive size turns cleanup off
        let max_size = config.get_as_long_with_default(MAX_SIZE_KEY, self.max_size as i64);
        self.max_size = usize::try_from(max_size).unwrap_or(0);
    }
}

#[async_trait]
impl<V> Cache<V> for MemoryCache<V>
where
    V: Clone + Send + Sync + 'static,
{
    async fn retrieve(&self, context: Option<&Context>, key: &str) -> Result<Option<V>> {
        check_key(context, key)?;

        let mut inner = self.inner.write().await;
        let now = self.clock.now_ms();
        let lookup = inner.lookup(key, now, self.timeout > 0);

        if matches!(lookup, Lookup::Expired) {
            debug!(trace_id = trace_of(context), key, "Cache entry expired on read");
        }
        Ok(lookup.into_value())
    }

    async fn store(
        &self,
        context: Option<&Context>,
        key: &str,
        value: Option<V>,
        timeout_ms: i64,
    ) -> Result<Option<V>> {
        check_key(context, key)?;

        let mut inner = self.inner.write().await;

        let Some(value) = value else {
            inner.take(key);
            return Ok(None);
        };

        let now = self.clock.now_ms();
        let timeout = self.effective_timeout(timeout_ms);
        inner.upsert(key, value.clone(), timeout, now);

        if self.max_size > 0 && inner.len() > self.max_size {
            let result = inner.cleanup(now, self.max_size);
            debug!(
                trace_id = trace_of(context),
                expired = result.expired,
                evicted = result.evicted.as_deref().unwrap_or("-"),
                remaining = inner.len(),
                "Cache cleanup after exceeding max size {}",
                self.max_size
            );
        }

        Ok(Some(value))
    }

    async fn remove(&self, context: Option<&Context>, key: &str) -> Result<()> {
        check_key(context, key)?;

        self.inner.write().await.take(key);
        Ok(())
    }
}

#[async_trait]
impl<V> ExpirationSweep for MemoryCache<V>
where
    V: Clone + Send + Sync + 'static,
{
    /// Removes expired entries, gated on a positive default timeout like reads are.
    async fn purge_expired(&self) -> usize {
        if self.timeout <= 0 {
            return 0;
        }
        let mut inner = self.inner.write().await;
        inner.purge_expired(self.clock.now_ms())
    }
}
