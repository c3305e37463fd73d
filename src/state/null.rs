//! No-op state store.

use async_trait::async_trait;

use crate::context::Context;
use crate::error::Result;
use crate::state::{StateStore, StateValue};

/// State store that keeps nothing.
///
/// Saves echo their value back, loads find nothing. Never fails, not even on
/// an empty key.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullStateStore;

impl NullStateStore {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl<V> StateStore<V> for NullStateStore
where
    V: Send + 'static,
{
    async fn load(&self, _context: Option<&Context>, _key: &str) -> Result<Option<V>> {
        Ok(None)
    }

    async fn load_bulk(
        &self,
        _context: Option<&Context>,
        _keys: &[String],
    ) -> Result<Vec<StateValue<V>>> {
        Ok(Vec::new())
    }

    async fn save(&self, _context: Option<&Context>, _key: &str, value: V) -> Result<V> {
        Ok(value)
    }

    async fn delete(&self, _context: Option<&Context>, _key: &str) -> Result<Option<V>> {
        Ok(None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_null_state_store_keeps_nothing() {
        let store = NullStateStore::new();

        assert_eq!(store.save(None, "k", 7).await.unwrap(), 7);
        assert_eq!(StateStore::<i32>::load(&store, None, "k").await.unwrap(), None);
        assert_eq!(StateStore::<i32>::delete(&store, None, "k").await.unwrap(), None);

        let bulk: Vec<StateValue<i32>> = store
            .load_bulk(None, &["k".to_string()])
            .await
            .unwrap();
        assert!(bulk.is_empty());
    }

    #[tokio::test]
    async fn test_null_state_store_accepts_empty_key() {
        let store = NullStateStore::new();

        assert_eq!(store.save(None, "", "v").await.unwrap(), "v");
        assert!(StateStore::<&str>::load(&store, None, "").await.is_ok());
        assert!(StateStore::<&str>::delete(&store, None, "").await.is_ok());
    }
}
