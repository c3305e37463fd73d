//! State Store Module
//!
//! Save/load oriented sibling of the cache, used for process and
//! transaction state.

mod memory;
mod null;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::context::Context;
use crate::error::Result;

pub use memory::MemoryStateStore;
pub use null::NullStateStore;

/// Key/value pair returned by bulk loads.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StateValue<V> {
    pub key: String,
    pub value: V,
}

impl<V> StateValue<V> {
    pub fn new(key: impl Into<String>, value: V) -> Self {
        Self {
            key: key.into(),
            value,
        }
    }
}

// == State Store Capability ==
/// Store for process state keyed by string.
///
/// An empty key is rejected with [`CacheError::InvalidArgument`](crate::CacheError)
/// by real implementations. Missing or expired state is `Ok(None)`.
#[async_trait]
pub trait StateStore<V>: Send + Sync
where
    V: Send + 'static,
{
    /// Loads the state under `key`, if any.
    async fn load(&self, context: Option<&Context>, key: &str) -> Result<Option<V>>;

    /// Loads several keys at once.
    ///
    /// Only keys holding live state appear in the result, in input order.
    /// The result may be shorter than `keys`.
    async fn load_bulk(&self, context: Option<&Context>, keys: &[String])
        -> Result<Vec<StateValue<V>>>;

    /// Saves `value` under `key`, returning it.
    async fn save(&self, context: Option<&Context>, key: &str, value: V) -> Result<V>;

    /// Deletes the state under `key`, returning what was there.
    async fn delete(&self, context: Option<&Context>, key: &str) -> Result<Option<V>>;
}
