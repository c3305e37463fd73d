//! Configuration Module
//!
//! Component configuration through dotted-key parameter maps, plus typed
//! settings loaded from environment variables.

use std::collections::HashMap;
use std::env;

use serde_json::Value;

/// Key holding the default time to live in milliseconds.
pub const TIMEOUT_KEY: &str = "options.timeout";
/// Key holding the soft cap on live cache entries.
pub const MAX_SIZE_KEY: &str = "options.max_size";

// == Config Params ==
/// Flat string map addressed by dotted keys such as `options.timeout`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConfigParams {
    values: HashMap<String, String>,
}

impl ConfigParams {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds parameters from key/value pairs.
    ///
    /// ```
    /// use memstate::ConfigParams;
    ///
    /// let config = ConfigParams::from_tuples([("options.timeout", 500)]);
    /// assert_eq!(config.get_as_long_with_default("options.timeout", 0), 500);
    /// ```
    pub fn from_tuples<K, V, I>(pairs: I) -> Self
    where
        K: Into<String>,
        V: ToString,
        I: IntoIterator<Item = (K, V)>,
    {
        let values = pairs
            .into_iter()
            .map(|(k, v)| (k.into(), v.to_string()))
            .collect();
        Self { values }
    }

    /// Flattens a JSON document into dotted keys.
    ///
    /// Nested objects join their keys with `.`, array items use their index
    /// and nulls are skipped.
    pub fn from_json(doc: &Value) -> Self {
        let mut params = Self::new();
        params.flatten("", doc);
        params
    }

    /// Parses a JSON string and flattens it like [`ConfigParams::from_json`].
    pub fn from_json_str(text: &str) -> serde_json::Result<Self> {
        let doc: Value = serde_json::from_str(text)?;
        Ok(Self::from_json(&doc))
    }

    fn flatten(&mut self, prefix: &str, value: &Value) {
        let join = |key: &str| {
            if prefix.is_empty() {
                key.to_string()
            } else {
                format!("{prefix}.{key}")
            }
        };

        match value {
            Value::Null => {}
            Value::Object(map) => {
                for (key, child) in map {
                    self.flatten(&join(key), child);
                }
            }
            Value::Array(items) => {
                for (index, child) in items.iter().enumerate() {
                    self.flatten(&join(&index.to_string()), child);
                }
            }
            Value::String(s) => self.set(prefix, s.clone()),
            other => self.set(prefix, other.to_string()),
        }
    }

    pub fn set(&mut self, key: impl Into<String>, value: impl ToString) {
        self.values.insert(key.into(), value.to_string());
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.values.get(key).map(String::as_str)
    }

    /// Returns the value as an integer, or `default` when missing or unparseable.
    pub fn get_as_long_with_default(&self, key: &str, default: i64) -> i64 {
        self.get(key)
            .and_then(|v| v.trim().parse().ok())
            .unwrap_or(default)
    }

    /// Returns the value as a non-negative size, or `default` when missing or unparseable.
    pub fn get_as_usize_with_default(&self, key: &str, default: usize) -> usize {
        self.get(key)
            .and_then(|v| v.trim().parse().ok())
            .unwrap_or(default)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

// == Configurable ==
/// Components that accept [`ConfigParams`] after construction.
///
/// Unrecognized keys are ignored; recognized keys with unparseable values
/// leave the current setting untouched.
pub trait Configurable {
    fn configure(&mut self, config: &ConfigParams);
}

/// Memory cache settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheConfig {
    /// Default TTL in milliseconds for stores without an explicit timeout
    pub timeout_ms: i64,
    /// Live entry count above which a cleanup pass runs (0 disables)
    pub max_size: usize,
}

impl CacheConfig {
    /// Loads settings from environment variables.
    ///
    /// # Environment Variables
    /// - `CACHE_TIMEOUT` - Default TTL in milliseconds (default: 60000)
    /// - `CACHE_MAX_SIZE` - Maximum live entries, non-positive disables cleanup (default: 1000)
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            timeout_ms: env::var("CACHE_TIMEOUT")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.timeout_ms),
            max_size: env::var("CACHE_MAX_SIZE")
                .ok()
                .and_then(|v| v.parse::<i64>().ok())
                .map_or(defaults.max_size, |v| usize::try_from(v).unwrap_or(0)),
        }
    }

    pub fn to_params(&self) -> ConfigParams {
        ConfigParams::from_tuples([
            (TIMEOUT_KEY, self.timeout_ms.to_string()),
            (MAX_SIZE_KEY, self.max_size.to_string()),
        ])
    }
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            timeout_ms: 60_000,
            max_size: 1000,
        }
    }
}

/// Memory state store settings.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StateStoreConfig {
    /// TTL in milliseconds applied on save; 0 keeps state until deleted
    pub timeout_ms: i64,
}

impl StateStoreConfig {
    /// Loads settings from environment variables.
    ///
    /// # Environment Variables
    /// - `STATE_STORE_TIMEOUT` - TTL in milliseconds (default: 0, never expires)
    pub fn from_env() -> Self {
        Self {
            timeout_ms: env::var("STATE_STORE_TIMEOUT")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(0),
        }
    }

    pub fn to_params(&self) -> ConfigParams {
        ConfigParams::from_tuples([(TIMEOUT_KEY, self.timeout_ms)])
    }
}
