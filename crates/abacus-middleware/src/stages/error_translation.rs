//! Error translation middleware.
//!
//! Turns a [`ServiceError`] returned by the next stage into a response
//! using the standard envelope:
//!
//! ```json
//! {
//!   "error": {
//!     "code": "BAD_REQUEST",
//!     "message": "division by zero"
//!   },
//!   "trace_id": "0190b6a4-..."
//! }
//! ```
//!
//! Known errors keep their status and message. Anything else is logged in
//! full and answered with a generic 500; the original error text never
//! reaches the caller. Either way the final status is recorded in the
//! context for the logging stage.
//!
//! # Pipeline Position
//!
//! ```text
//! PanicRecovery → Logging → [ErrorTranslation] → Handler
//! ```

use crate::{
    context::MiddlewareContext,
    middleware::{BoxFuture, Middleware, Next},
    types::{HandlerResult, Request, Response, ResponseExt},
};
use abacus_core::ServiceError;

/// Renders downstream errors as JSON envelope responses.
#[derive(Debug, Clone, Copy, Default)]
pub struct ErrorTranslationMiddleware;

impl ErrorTranslationMiddleware {
    /// Creates the middleware.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    fn log_error(ctx: &MiddlewareContext, error: &ServiceError) {
        if error.is_known() {
            tracing::warn!(
                trace_id = %ctx.trace_id(),
                method = %ctx.method(),
                path = %ctx.path(),
                status = error.status_code().as_u16(),
                error = %error,
                "request failed"
            );
        } else {
            let chain = std::iter::successors(std::error::Error::source(error), |e| e.source())
                .map(ToString::to_string)
                .collect::<Vec<_>>();
            tracing::error!(
                trace_id = %ctx.trace_id(),
                method = %ctx.method(),
                path = %ctx.path(),
                remote_addr = ?ctx.remote_addr(),
                error = %error,
                caused_by = ?chain,
                "internal error"
            );
        }
    }
}

impl Middleware for ErrorTranslationMiddleware {
    fn name(&self) -> &'static str {
        "error_translation"
    }

    fn process<'a>(
        &'a self,
        ctx: &'a mut MiddlewareContext,
        request: Request,
        next: Next<'a>,
    ) -> BoxFuture<'a, HandlerResult> {
        Box::pin(async move {
            match next.run(ctx, request).await {
                Ok(response) => {
                    ctx.set_status_code(response.status());
                    Ok(response)
                }
                Err(error) => {
                    Self::log_error(ctx, &error);
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
    use abacus_core::INTERNAL_ERROR_MESSAGE;
    use bytes::Bytes;
    use http::{Method, Request as HttpRequest, StatusCode};
    use http_body_util::{BodyExt, Full};

    fn request() -> Request {
        HttpRequest::builder()
            .uri("/translate")
            .body(Full::new(Bytes::new()))
            .unwrap()
    }

    async fn run_with(error: ServiceError) -> (MiddlewareContext, Response) {
        let mw = ErrorTranslationMiddleware::new();
        let mut ctx = MiddlewareContext::new(Method::POST, "/translate");
        let next = Next::handler(move |_ctx, _req| Box::pin(async move { Err(error) }));
        let response = mw.process(&mut ctx, request(), next).await.unwrap();
        (ctx, response)
    }

    async fn body_json(response: Response) -> serde_json::Value {
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_known_error_keeps_status_and_message() {
        let (ctx, response) = run_with(ServiceError::bad_request("division by zero")).await;

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(ctx.status_code(), Some(StatusCode::BAD_REQUEST));

        let json = body_json(response).await;
        assert_eq!(json["error"]["code"], "BAD_REQUEST");
        assert_eq!(json["error"]["message"], "division by zero");
        assert_eq!(json["trace_id"], ctx.trace_id().to_string());
    }

    #[tokio::test]
    async fn test_internal_error_is_masked() {
        let io = std::io::Error::new(std::io::ErrorKind::Other, "disk on fire");
        let (ctx, response) =
            run_with(ServiceError::internal_with_source("save failed", io)).await;

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(ctx.status_code(), Some(StatusCode::INTERNAL_SERVER_ERROR));

        let json = body_json(response).await;
        assert_eq!(json["error"]["message"], INTERNAL_ERROR_MESSAGE);
        assert!(!json.to_string().contains("disk on fire"));
        assert!(!json.to_string().contains("save failed"));
    }

    #[tokio::test]
    async fn test_success_records_status() {
        let mw = ErrorTranslationMiddleware::new();
        let mut ctx = MiddlewareContext::new(Method::GET, "/translate");
        let next = Next::handler(|_ctx, _req| {
            Box::pin(async { Response::json(StatusCode::OK, &"fine") })
        });

        let response = mw.process(&mut ctx, request(), next).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(ctx.status_code(), Some(StatusCode::OK));
    }
}
