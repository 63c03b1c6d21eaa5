//! Panic recovery middleware.
//!
//! This is the outermost stage. A panic anywhere downstream, including in
//! the terminal handler, is caught here and turned into exactly one
//! internal-error response. The panicking request's task survives, and so
//! does every other connection.
//!
//! # Pipeline Position
//!
//! ```text
//! [PanicRecovery] → Logging → ErrorTranslation → Handler
//! ```

use crate::{
    context::MiddlewareContext,
    middleware::{BoxFuture, Middleware, Next},
    types::{HandlerResult, Request, Response, ResponseExt},
};
use abacus_core::ServiceError;
use futures_util::FutureExt;
use std::any::Any;
use std::panic::AssertUnwindSafe;

/// Catches downstream panics and answers with a 500 envelope.
#[derive(Debug, Clone, Copy, Default)]
pub struct PanicRecoveryMiddleware;

impl PanicRecoveryMiddleware {
    /// Creates the middleware.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

/// Extracts a printable message from a panic payload.
pub(crate) fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic payload".to_string()
    }
}

impl Middleware for PanicRecoveryMiddleware {
    fn name(&self) -> &'static str {
        "panic_recovery"
    }

    fn process<'a>(
        &'a self,
        ctx: &'a mut MiddlewareContext,
        request: Request,
        next: Next<'a>,
    ) -> BoxFuture<'a, HandlerResult> {
        Box::pin(async move {
            let outcome = AssertUnwindSafe(next.run(ctx, request)).catch_unwind().await;

            match outcome {
                Ok(result) => result,
                Err(payload) => {
                    let message = panic_message(&*payload);
                    tracing::error!(
                        trace_id = %ctx.trace_id(),
                        method = %ctx.method(),
                        path = %ctx.path(),
                        remote_addr = ?ctx.remote_addr(),
                        duration_ms = ctx.elapsed().as_millis() as u64,
                        panic = %message,
                        "recovered from panic"
                    );

                    let error = ServiceError::internal(format!("panic: {message}"));
                    ctx.set_status_code(error.status_code());
                    let trace_id = ctx.trace_id().to_string();
                    Response::from_service_error(&error, Some(&trace_id))
                }
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bytes::Bytes;
    use http::{Method, Request as HttpRequest, StatusCode};
    use http_body_util::{BodyExt, Full};

    fn request() -> Request {
        HttpRequest::builder()
            .uri("/boom")
            .body(Full::new(Bytes::new()))
            .unwrap()
    }

    async fn exploding_handler() -> HandlerResult {
        panic!("handler exploded")
    }

    #[test]
    fn test_panic_message_variants() {
        let s: Box<dyn Any + Send> = Box::new("static str");
        assert_eq!(panic_message(&*s), "static str");

        let owned: Box<dyn Any + Send> = Box::new(String::from("owned"));
        assert_eq!(panic_message(&*owned), "owned");

        let other: Box<dyn Any + Send> = Box::new(42_u32);
        assert_eq!(panic_message(&*other), "unknown panic payload");
    }

    #[tokio::test]
    async fn test_panic_in_handler_becomes_500() {
        let mw = PanicRecoveryMiddleware::new();
        let mut ctx = MiddlewareContext::new(Method::GET, "/boom");
        let next = Next::handler(|_ctx, _req| Box::pin(exploding_handler()));

        let response = mw.process(&mut ctx, request(), next).await.unwrap();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(ctx.status_code(), Some(StatusCode::INTERNAL_SERVER_ERROR));

        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let json: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(json["error"]["code"], "INTERNAL_ERROR");
        assert_eq!(json["error"]["message"], abacus_core::INTERNAL_ERROR_MESSAGE);
        assert!(!String::from_utf8_lossy(&bytes).contains("exploded"));
    }

    #[tokio::test]
    async fn test_passes_through_without_panic() {
        let mw = PanicRecoveryMiddleware::new();
        let mut ctx = MiddlewareContext::new(Method::GET, "/fine");
        let next = Next::handler(|_ctx, _req| {
            Box::pin(async { Err(ServiceError::bad_request("nope")) })
        });

        let result = mw.process(&mut ctx, request(), next).await;
        assert!(matches!(result, Err(ServiceError::BadRequest { .. })));
        assert!(ctx.status_code().is_none());
    }
}
