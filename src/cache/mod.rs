//! Cache Module
//!
//! Provides the cache capability trait, the in-memory TTL cache with
//! soonest-to-expire eviction, and a no-op stand-in.

mod entry;
pub(crate) mod map;
mod null;
mod stats;
mod store;


use async_trait::async_trait;

use crate::context::Context;
use crate::error::Result;

// Re-export public types
pub use entry::CacheEntry;
pub use null::NullCache;
pub use stats::CacheStats;
pub use store::MemoryCache;

// == Public Constants ==
/// Default time to live in milliseconds
pub const DEFAULT_TIMEOUT_MS: i64 = 60_000;

/// Default maximum number of live entries
pub const DEFAULT_MAX_SIZE: usize = 1000;

// == Cache Capability ==
/// Transient key/value cache consumed by persistence and business components.
///
/// An empty key is rejected with [`CacheError::InvalidArgument`](crate::CacheError)
/// by real implementations. Missing or expired values are `Ok(None)`.
#[async_trait]
pub trait Cache<V>: Send + Sync
where
    V: Send + 'static,
{
    /// Returns the live value under `key`, if any.
    async fn retrieve(&self, context: Option<&Context>, key: &str) -> Result<Option<V>>;

    /// Stores `value` under `key` for `timeout_ms` milliseconds.
    ///
    /// A non-positive timeout selects the configured default. Storing `None`
    /// removes the key. Returns the value that was passed in.
    async fn store(
        &self,
        context: Option<&Context>,
        key: &str,
        value: Option<V>,
        timeout_ms: i64,
    ) -> Result<Option<V>>;

    /// Removes the value under `key`. Removing a missing key is a no-op.
    async fn remove(&self, context: Option<&Context>, key: &str) -> Result<()>;
}
