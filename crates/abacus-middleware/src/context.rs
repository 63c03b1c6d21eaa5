//! Middleware context types.
//!
//! The [`MiddlewareContext`] carries per-request state through the pipeline.
//! It is separate from [`RequestContext`](abacus_core::RequestContext) so
//! that stages can write to it (the final status code) while handlers only
//! get a read-only snapshot.

use abacus_core::{RequestContext, TraceId};
use http::{Method, StatusCode};
use std::net::SocketAddr;
use std::time::{Duration, Instant};

/// Context that flows through the middleware pipeline.
///
/// Created by the dispatcher once a route matches and dropped when the
/// response has been handed back. It is never shared between requests.
///
/// # Example
///
/// ```
/// use abacus_middleware::context::MiddlewareContext;
/// use http::{Method, StatusCode};
///
/// let mut ctx = MiddlewareContext::new(Method::GET, "/healthz");
/// assert!(ctx.status_code().is_none());
///
/// ctx.set_status_code(StatusCode::OK);
/// assert_eq!(ctx.status_code(), Some(StatusCode::OK));
/// ```
#[derive(Debug, Clone)]
pub struct MiddlewareContext {
    trace_id: TraceId,
    method: Method,
    path: String,
    remote_addr: Option<SocketAddr>,
    started_at: Instant,
    /// Written by error translation and panic recovery, read by logging.
    status_code: Option<StatusCode>,
}

impl MiddlewareContext {
    /// Creates a new context with a fresh trace ID, starting now.
    #[must_use]
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self::with_trace_id(TraceId::new(), method, path)
    }

    /// Creates a context with a specific trace ID.
    #[must_use]
    pub fn with_trace_id(trace_id: TraceId, method: Method, path: impl Into<String>) -> Self {
        Self {
            trace_id,
            method,
            path: path.into(),
            remote_addr: None,
            started_at: Instant::now(),
            status_code: None,
        }
    }

    /// Sets the peer address of the connection.
    #[must_use]
    pub fn with_remote_addr(mut self, remote_addr: Option<SocketAddr>) -> Self {
        self.remote_addr = remote_addr;
        self
    }

    /// Returns the trace ID.
    #[must_use]
    pub fn trace_id(&self) -> TraceId {
        self.trace_id
    }

    /// Returns the request method.
    #[must_use]
    pub fn method(&self) -> &Method {
        &self.method
    }

    /// Returns the request path.
    #[must_use]
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Returns the peer address, if known.
    #[must_use]
    pub fn remote_addr(&self) -> Option<SocketAddr> {
        self.remote_addr
    }

    /// Returns when the request was dispatched.
    #[must_use]
    pub fn started_at(&self) -> Instant {
        self.started_at
    }

    /// Returns the elapsed time since dispatch.
    #[must_use]
    pub fn elapsed(&self) -> Duration {
        self.started_at.elapsed()
    }

    /// Returns the recorded response status, if any stage has set it.
    #[must_use]
    pub fn status_code(&self) -> Option<StatusCode> {
        self.status_code
    }

    /// Records the response status.
    ///
    /// Later writes overwrite earlier ones.
    pub fn set_status_code(&mut self, status: StatusCode) {
        self.status_code = Some(status);
    }

    /// Converts this context into the handler view.
    #[must_use]
    pub fn to_request_context(&self) -> RequestContext {
        RequestContext::from_parts(
            self.trace_id,
            self.method.clone(),
            self.path.clone(),
            self.started_at,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_context_has_no_status() {
        let ctx = MiddlewareContext::new(Method::POST, "/api/v1/calculator/addition");
        assert!(ctx.status_code().is_none());
        assert!(ctx.remote_addr().is_none());
        assert_eq!(ctx.path(), "/api/v1/calculator/addition");
    }

    #[test]
    fn test_status_code_is_rewritable() {
        let mut ctx = MiddlewareContext::new(Method::GET, "/");
        ctx.set_status_code(StatusCode::OK);
        ctx.set_status_code(StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(ctx.status_code(), Some(StatusCode::INTERNAL_SERVER_ERROR));
    }

    #[test]
    fn test_elapsed_time() {
        let ctx = MiddlewareContext::new(Method::GET, "/");
        std::thread::sleep(Duration::from_millis(10));
        assert!(ctx.elapsed() >= Duration::from_millis(10));
    }

    #[test]
    fn test_to_request_context() {
        let addr: SocketAddr = "127.0.0.1:9000".parse().unwrap();
        let ctx = MiddlewareContext::new(Method::GET, "/api/v1/calculator/recent")
            .with_remote_addr(Some(addr));

        let req_ctx = ctx.to_request_context();
        assert_eq!(req_ctx.trace_id(), ctx.trace_id());
        assert_eq!(req_ctx.method(), &Method::GET);
        assert_eq!(req_ctx.path(), "/api/v1/calculator/recent");
        assert_eq!(req_ctx.started_at(), ctx.started_at());
    }
}
