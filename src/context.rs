//! Call Context
//!
//! Opaque trace token threaded through every store operation.

use std::fmt;

/// Trace/correlation token supplied by callers.
///
/// The stores never interpret it; it only ends up in error values and log fields.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Context {
    trace_id: Option<String>,
}

impl Context {
    /// Creates a context carrying the given trace id.
    pub fn new(trace_id: impl Into<String>) -> Self {
        Self {
            trace_id: Some(trace_id.into()),
        }
    }

    /// Returns the trace id, if any.
    pub fn trace_id(&self) -> Option<&str> {
        self.trace_id.as_deref()
    }
}

impl fmt::Display for Context {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.trace_id().unwrap_or("-"))
    }
}

/// Renders an optional context for log fields.
pub(crate) fn trace_of(context: Option<&Context>) -> &str {
    context.and_then(Context::trace_id).unwrap_or("-")
}
