//! Cache Entry Module
//!
//! Defines the record held per key, pairing a value with its absolute expiration.

// == Cache Entry ==
/// A single stored value together with its expiration timestamp.
///
/// The key never changes after creation. Value and expiration change together
/// through [`CacheEntry::set_value`].
#[derive(Debug, Clone, PartialEq)]
pub struct CacheEntry<V> {
    key: String,
    value: V,
    /// Expiration timestamp (Unix milliseconds)
    expiration: i64,
}

impl<V> CacheEntry<V> {
    // == Constructor ==
    /// Creates a new entry expiring `timeout_ms` after `now`.
    ///
    /// # Arguments
    /// * `key` - The key the entry is stored under
    /// * `value` - The value to store
    /// * `timeout_ms` - Time to live in milliseconds
    /// * `now` - Current Unix timestamp in milliseconds
    pub fn new(key: impl Into<String>, value: V, timeout_ms: i64, now: i64) -> Self {
        Self {
            key: key.into(),
            value,
            expiration: now.saturating_add(timeout_ms),
        }
    }

    /// Returns the key.
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Returns the stored value.
    pub fn value(&self) -> &V {
        &self.value
    }

    /// Returns the expiration timestamp in Unix milliseconds.
    pub fn expiration(&self) -> i64 {
        self.expiration
    }

    /// Consumes the entry, returning its value.
    pub fn into_value(self) -> V {
        self.value
    }

    // == Set Value ==
    /// Replaces the value and restarts its lifetime from `now`.
    pub fn set_value(&mut self, value: V, timeout_ms: i64, now: i64) {
        self.value = value;
        self.expiration = now.saturating_add(timeout_ms);
    }

    // == Is Expired ==
    /// Checks if the entry has expired.
    ///
    /// Boundary condition: the comparison is strict. At `now == expiration`
    /// the entry is still live; one millisecond later it is expired.
    pub fn is_expired(&self, now: i64) -> bool {
        self.expiration < now
    }
}
