//! Error types for the cache and state store
//!
//! Provides unified error handling using thiserror.

use thiserror::Error;

use crate::context::Context;

// == Cache Error Enum ==
/// Unified error type for cache and state store operations.
///
/// Missing or expired entries are not errors; they surface as `Ok(None)`.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CacheError {
    /// A keyed operation was called without a usable key
    #[error("Invalid argument: {message}")]
    InvalidArgument {
        /// Trace id of the calling context, if one was supplied
        trace_id: Option<String>,
        /// Human readable description
        message: String,
    },
}

impl CacheError {
    /// Builds the error raised when a keyed operation receives an empty key.
    pub fn empty_key(context: Option<&Context>) -> Self {
        CacheError::InvalidArgument {
            trace_id: context.and_then(|c| c.trace_id().map(str::to_string)),
            message: "Key cannot be empty".to_string(),
        }
    }

    /// Returns the trace id carried by the error.
    pub fn trace_id(&self) -> Option<&str> {
        match self {
            CacheError::InvalidArgument { trace_id, .. } => trace_id.as_deref(),
        }
    }
}

// == Result Type Alias ==
/// Convenience Result type for cache operations.
pub type Result<T> = std::result::Result<T, CacheError>;

/// Rejects empty keys on behalf of every keyed operation.
pub(crate) fn check_key(context: Option<&Context>, key: &str) -> Result<()> {
    if key.is_empty() {
        return Err(CacheError::empty_key(context));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_key_carries_trace_id() {
        let context = Context::new("trace-42");
        let err = CacheError::empty_key(Some(&context));

        assert_eq!(err.trace_id(), Some("trace-42"));
        assert_eq!(err.to_string(), "Invalid argument: Key cannot be empty");
    }

    #[test]
    fn test_empty_key_without_context() {
        let err = CacheError::empty_key(None);
        assert!(err.trace_id().is_none());
    }

    #[test]
    fn test_check_key() {
        assert!(check_key(None, "key").is_ok());
        assert!(matches!(
            check_key(None, ""),
            Err(CacheError::InvalidArgument { .. })
        ));
    }
}
