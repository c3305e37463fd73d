//! No-op cache.

use async_trait::async_trait;

use crate::cache::Cache;
use crate::context::Context;
use crate::error::Result;

/// Cache that stores nothing.
///
/// Lets caching be switched off without touching call sites. Never fails,
/// not even on an empty key.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullCache;

impl NullCache {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl<V> Cache<V> for NullCache
where
    V: Send + 'static,
{
    async fn retrieve(&self, _context: Option<&Context>, _key: &str) -> Result<Option<V>> {
        Ok(None)
    }

    async fn store(
        &self,
        _context: Option<&Context>,
        _key: &str,
        value: Option<V>,
        _timeout_ms: i64,
    ) -> Result<Option<V>> {
        Ok(value)
    }

    async fn remove(&self, _context: Option<&Context>, _key: &str) -> Result<()> {
        Ok(())
    }
}
