//! Request context types.
//!
//! The [`RequestContext`] is the handler-facing snapshot of the per-request
//! state. The mutable bag that middleware writes into lives in
//! `abacus-middleware` and is converted into this type right before the
//! terminal handler runs.

use http::Method;
use serde::{Deserialize, Serialize};
use std::time::{Duration, Instant};
use uuid::Uuid;

/// A unique identifier for each routed request, using UUID v7.
///
/// UUID v7 is time-ordered, so trace ids sort in arrival order in logs.
///
/// # Example
///
/// ```
/// use abacus_core::TraceId;
///
/// let id = TraceId::new();
/// assert_eq!(id.to_string().len(), 36);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TraceId(Uuid);

impl TraceId {
    /// Creates a new unique trace ID.
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::now_v7())
    }

    /// Creates a `TraceId` from an existing UUID.
    #[must_use]
    pub const fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Returns the underlying UUID.
    #[must_use]
    pub const fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for TraceId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for TraceId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<Uuid> for TraceId {
    fn from(uuid: Uuid) -> Self {
        Self(uuid)
    }
}

/// Per-request context handed to terminal handlers.
///
/// Handlers only read from the context; everything that is written during a
/// request (the final status code) is recorded by the middleware stages.
///
/// # Example
///
/// ```
/// use abacus_core::RequestContext;
/// use http::Method;
///
/// let ctx = RequestContext::new(Method::GET, "/healthz");
/// assert_eq!(ctx.path(), "/healthz");
/// ```
#[derive(Debug, Clone)]
pub struct RequestContext {
    trace_id: TraceId,
    method: Method,
    path: String,
    started_at: Instant,
}

impl RequestContext {
    /// Creates a context with a fresh trace ID, starting now.
    #[must_use]
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            trace_id: TraceId::new(),
            method,
            path: path.into(),
            started_at: Instant::now(),
        }
    }

    /// Rebuilds a context from values captured by the middleware pipeline.
    #[must_use]
    pub fn from_parts(trace_id: TraceId, method: Method, path: String, started_at: Instant) -> Self {
        Self {
            trace_id,
            method,
            path,
            started_at,
        }
    }

    /// Creates a context for tests.
    #[must_use]
    pub fn mock() -> Self {
        Self::new(Method::GET, "/")
    }

    /// Returns the trace ID.
    #[must_use]
    pub const fn trace_id(&self) -> TraceId {
        self.trace_id
    }

    /// Returns the request method.
    #[must_use]
    pub const fn method(&self) -> &Method {
        &self.method
    }

    /// Returns the request path.
    #[must_use]
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Returns when the request was dispatched.
    #[must_use]
    pub const fn started_at(&self) -> Instant {
        self.started_at
    }

    /// Returns the time elapsed since dispatch.
    #[must_use]
    pub fn elapsed(&self) -> Duration {
        self.started_at.elapsed()
    }
}
