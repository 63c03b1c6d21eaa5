//! Request logging middleware.
//!
//! Emits a `request started` event before calling the next stage and a
//! `request finished` event after it returns. The finish event carries the
//! elapsed time and whatever status code the inner stages recorded in the
//! context. The result of the next stage is returned untouched.
//!
//! # Pipeline Position
//!
//! ```text
//! PanicRecovery → [Logging] → ErrorTranslation → Handler
//! ```
//!
//! # Log Fields
//!
//! - `trace_id` - per-request identifier
//! - `method`, `path`, `remote_addr` - what was asked and by whom
//! - `status` - final status code (`0` if none was recorded)
//! - `duration_ms` - wall time spent downstream

use crate::{
    context::MiddlewareContext,
    middleware::{BoxFuture, Middleware, Next},
    types::{HandlerResult, Request},
};

/// Logs the start and end of every request.
#[derive(Debug, Clone, Copy, Default)]
pub struct LoggingMiddleware;

impl LoggingMiddleware {
    /// Creates the middleware.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl Middleware for LoggingMiddleware {
    fn name(&self) -> &'static str {
        "logging"
    }

    fn process<'a>(
        &'a self,
        ctx: &'a mut MiddlewareContext,
        request: Request,
        next: Next<'a>,
    ) -> BoxFuture<'a, HandlerResult> {
        Box::pin(async move {
            tracing::info!(
                trace_id = %ctx.trace_id(),
                method = %ctx.method(),
                path = %ctx.path(),
                remote_addr = ?ctx.remote_addr(),
                "request started"
            );

            let result = next.run(ctx, request).await;

            let status = ctx.status_code().map_or(0, |s| s.as_u16());
            let duration_ms = ctx.elapsed().as_millis() as u64;

            match &result {
                Ok(_) => tracing::info!(
                    trace_id = %ctx.trace_id(),
                    method = %ctx.method(),
                    path = %ctx.path(),
                    status,
                    duration_ms,
                    "request finished"
                ),
                Err(error) => tracing::info!(
                    trace_id = %ctx.trace_id(),
                    method = %ctx.method(),
                    path = %ctx.path(),
                    status,
                    duration_ms,
                    error = %error,
                    "request finished"
                ),
            }

            result
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Response, ResponseExt};
    use abacus_core::ServiceError;
    use bytes::Bytes;
    use http::{Method, Request as HttpRequest, StatusCode};
    use http_body_util::Full;
    use tracing_test::traced_test;

    use crate::pipeline::Pipeline;
    use crate::stages::ErrorTranslationMiddleware;

    fn request() -> Request {
        HttpRequest::builder()
            .uri("/log")
            .body(Full::new(Bytes::new()))
            .unwrap()
    }

    #[tokio::test]
    async fn test_returns_inner_response_unchanged() {
        let mw = LoggingMiddleware::new();
        let mut ctx = MiddlewareContext::new(Method::GET, "/log");
        let next = Next::handler(|ctx, _req| {
            ctx.set_status_code(StatusCode::ACCEPTED);
            Box::pin(async { Response::json(StatusCode::ACCEPTED, &"queued") })
        });

        let response = mw.process(&mut ctx, request(), next).await.unwrap();
        assert_eq!(response.status(), StatusCode::ACCEPTED);
        assert_eq!(ctx.status_code(), Some(StatusCode::ACCEPTED));
    }

    #[tokio::test]
    async fn test_does_not_swallow_errors() {
        let mw = LoggingMiddleware::new();
        let mut ctx = MiddlewareContext::new(Method::GET, "/log");
        let next = Next::handler(|_ctx, _req| {
            Box::pin(async { Err(ServiceError::internal("downstream broke")) })
        });

        let result = mw.process(&mut ctx, request(), next).await;
        assert!(matches!(result, Err(ServiceError::Internal { .. })));
    }

    #[tokio::test]
    #[traced_test]
    async fn test_finish_event_carries_translated_status() {
        let pipeline = Pipeline::builder()
            .add_stage(LoggingMiddleware::new())
            .add_stage(ErrorTranslationMiddleware::new())
            .build();
        let mut ctx = MiddlewareContext::new(Method::POST, "/api/v1/calculator/division");
        let trace_id = ctx.trace_id();

        let response = pipeline
            .run(&mut ctx, request(), |_ctx, _req| {
                Box::pin(async { Err(ServiceError::bad_request("division by zero")) })
            })
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        assert!(logs_contain("request started"));
        assert!(logs_contain("request finished"));
        assert!(logs_contain(&format!("trace_id={trace_id}")));
        assert!(logs_contain("path=/api/v1/calculator/division"));
        assert!(logs_contain("status=400"));
        assert!(logs_contain("duration_ms="));
    }

    #[tokio::test]
    #[traced_test]
    async fn test_finish_event_without_status_logs_zero() {
        let mw = LoggingMiddleware::new();
        let mut ctx = MiddlewareContext::new(Method::GET, "/log");
        let next = Next::handler(|_ctx, _req| {
            Box::pin(async { Response::json(StatusCode::OK, &"untracked") })
        });

        mw.process(&mut ctx, request(), next).await.unwrap();

        assert!(logs_contain("request finished"));
        assert!(logs_contain("status=0"));
    }
}
