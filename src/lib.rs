//! Memstate - In-memory cache and state store
//!
//! Provides a TTL cache with lazy expiration and soonest-to-expire eviction,
//! a parallel state store, and no-op stand-ins for both.

pub mod cache;
pub mod clock;
pub mod config;
pub mod context;
pub mod error;
pub mod state;
pub mod tasks;

pub use cache::{Cache, CacheEntry, CacheStats, MemoryCache, NullCache};
pub use clock::{Clock, ManualClock, SystemClock};
pub use config::{CacheConfig, ConfigParams, Configurable, StateStoreConfig};
pub use context::Context;
pub use error::{CacheError, Result};
pub use state::{MemoryStateStore, NullStateStore, StateStore, StateValue};
pub use tasks::{spawn_purge_task, ExpirationSweep};
