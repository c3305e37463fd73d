//! Memory State Store Module
//!
//! Process state kept in memory, using the same entry machinery as the cache
//! but without capacity-triggered eviction.

use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;
use tracing::debug;

use crate::cache::map::{EntryMap, Lookup};
use crate::cache::CacheStats;
use crate::clock::{Clock, SystemClock};
use crate::config::{ConfigParams, Configurable, StateStoreConfig, TIMEOUT_KEY};
use crate::context::{trace_of, Context};
use crate::error::{check_key, Result};
use crate::state::{StateStore, StateValue};
use crate::tasks::ExpirationSweep;

// == Memory State Store ==
/// In-memory state store.
///
/// With the default timeout of 0 state lives until deleted. A positive
/// `options.timeout` makes saved state expire lazily, exactly like cache
/// entries. State growth is not bounded by the store.
#[derive(Debug)]
pub struct MemoryStateStore<V> {
    inner: RwLock<EntryMap<V>>,
    /// TTL in milliseconds applied on save
    timeout: i64,
    clock: Arc<dyn Clock>,
}

impl<V: Clone + Send + Sync> MemoryStateStore<V> {
    pub fn new() -> Self {
        Self {
            inner: RwLock::new(EntryMap::new()),
            timeout: 0,
            clock: Arc::new(SystemClock),
        }
    }

    pub fn from_config(config: &StateStoreConfig) -> Self {
        let mut store = Self::new();
        store.configure(&config.to_params());
        store
    }

    /// Replaces the time source.
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    pub fn timeout(&self) -> i64 {
        self.timeout
    }

    pub async fn len(&self) -> usize {
        self.inner.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }

    pub async fn stats(&self) -> CacheStats {
        self.inner.read().await.stats()
    }

    pub async fn clear(&self) {
        self.inner.write().await.clear();
    }

    fn check_expiry(&self) -> bool {
        self.timeout > 0
    }
}

impl<V: Clone + Send + Sync> Default for MemoryStateStore<V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V> Configurable for MemoryStateStore<V> {
    fn configure(&mut self, config: &ConfigParams) {
        self.timeout = config.get_as_long_with_default(TIMEOUT_KEY, self.timeout);
    }
}

#[async_trait]
impl<V> StateStore<V> for MemoryStateStore<V>
where
    V: Clone + Send + Sync + 'static,
{
    async fn load(&self, context: Option<&Context>, key: &str) -> Result<Option<V>> {
        check_key(context, key)?;

        let mut inner = self.inner.write().await;
        let lookup = inner.lookup(key, self.clock.now_ms(), self.check_expiry());

        if matches!(lookup, Lookup::Expired) {
            debug!(trace_id = trace_of(context), key, "State expired on load");
        }
        Ok(lookup.into_value())
    }

    async fn load_bulk(
        &self,
        context: Option<&Context>,
        keys: &[String],
    ) -> Result<Vec<StateValue<V>>> {
        let check_expiry = self.check_expiry();
        let mut inner = self.inner.write().await;
        let now = self.clock.now_ms();

        let mut result = Vec::new();
        for key in keys.iter().filter(|k| !k.is_empty()) {
            match inner.lookup(key, now, check_expiry) {
                Lookup::Hit(value) => result.push(StateValue::new(key.as_str(), value)),
                Lookup::Expired => {
                    debug!(
                        trace_id = trace_of(context),
                        key = key.as_str(),
                        "State expired on bulk load"
                    );
                }
                Lookup::Miss => {}
            }
        }

        Ok(result)
    }

    async fn save(&self, context: Option<&Context>, key: &str, value: V) -> Result<V> {
        check_key(context, key)?;

        let timeout = self.timeout.max(0);
        let mut inner = self.inner.write().await;
        inner.upsert(key, value.clone(), timeout, self.clock.now_ms());
        Ok(value)
    }

    async fn delete(&self, context: Option<&Context>, key: &str) -> Result<Option<V>> {
        check_key(context, key)?;

        Ok(self.inner.write().await.take(key))
    }
}

#[async_trait]
impl<V> ExpirationSweep for MemoryStateStore<V>
where
    V: Clone + Send + Sync + 'static,
{
    async fn purge_expired(&self) -> usize {
        if !self.check_expiry() {
            return 0;
        }
        let mut inner = self.inner.write().await;
        inner.purge_expired(self.clock.now_ms())
    }
}
