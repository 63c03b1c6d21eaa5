//! Route registration and dispatch.
//!
//! An [`App`] owns the global middleware [`Pipeline`] and a table of
//! exact `(method, path)` routes. Each route stores the global stages with
//! its own extra stages appended inside them, so the order seen by a
//! request is: global stages (outermost first), route stages, handler.

use std::collections::HashMap;
use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;

use abacus_core::{RequestContext, ServiceError};
use abacus_middleware::{
    BoxFuture, BoxedMiddleware, HandlerResult, MiddlewareContext, Pipeline, Request, Response,
    ResponseExt,
};
use http::header::ALLOW;
use http::{HeaderValue, Method};

/// Response header carrying the request's trace id.
pub const TRACE_ID_HEADER: &str = "x-trace-id";

/// A type-erased terminal handler.
pub type Handler = Arc<dyn Fn(RequestContext, Request) -> BoxFuture<'static, HandlerResult> + Send + Sync>;

struct Route {
    pipeline: Pipeline,
    handler: Handler,
}

/// Binds `(method, path)` pairs to fully wrapped handlers.
///
/// # Example
///
/// ```rust
/// use abacus_middleware::{Pipeline, Response, ResponseExt};
/// use abacus_server::App;
/// use http::{Method, StatusCode};
///
/// let mut app = App::new(Pipeline::default());
/// app.get("api/v1/calculator", "/recent/", |_ctx, _req| async {
///     Response::json(StatusCode::OK, &"ok")
/// });
///
/// assert!(app.has_route(&Method::GET, "/api/v1/calculator/recent/"));
/// assert!(app.has_route(&Method::GET, "/api/v1/calculator/recent"));
/// ```
pub struct App {
    global: Pipeline,
    routes: HashMap<(Method, String), Route>,
}

impl App {
    /// Creates an app whose routes are all wrapped in `global`.
    #[must_use]
    pub fn new(global: Pipeline) -> Self {
        Self {
            global,
            routes: HashMap::new(),
        }
    }

    /// Registers a handler.
    ///
    /// The final path is `"/" + group + path` when `group` is non-empty,
    /// otherwise `path`. A path ending in `/` is also registered without
    /// it. `extra` runs inside the global stages, first element outermost.
    pub fn handle<F, Fut>(
        &mut self,
        method: Method,
        group: &str,
        path: &str,
        handler: F,
        extra: Vec<BoxedMiddleware>,
    ) where
        F: Fn(RequestContext, Request) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = HandlerResult> + Send + 'static,
    {
        let handler: Handler = Arc::new(
            move |ctx: RequestContext, request: Request| -> BoxFuture<'static, HandlerResult> {
                Box::pin(handler(ctx, request))
            },
        );
        let pipeline = self.global.extend(extra);

        let final_path = if group.is_empty() {
            path.to_string()
        } else {
            format!("/{group}{path}")
        };

        if let Some(stripped) = final_path.strip_suffix('/') {
            if !stripped.is_empty() {
                self.insert(&method, stripped.to_string(), &pipeline, &handler);
            }
        }
        self.insert(&method, final_path, &pipeline, &handler);
    }

    /// Registers a `GET` handler with no extra middleware.
    pub fn get<F, Fut>(&mut self, group: &str, path: &str, handler: F)
    where
        F: Fn(RequestContext, Request) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = HandlerResult> + Send + 'static,
    {
        self.handle(Method::GET, group, path, handler, Vec::new());
    }

    /// Registers a `POST` handler with no extra middleware.
    pub fn post<F, Fut>(&mut self, group: &str, path: &str, handler: F)
    where
        F: Fn(RequestContext, Request) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = HandlerResult> + Send + 'static,
    {
        self.handle(Method::POST, group, path, handler, Vec::new());
    }

    fn insert(&mut self, method: &Method, path: String, pipeline: &Pipeline, handler: &Handler) {
        tracing::debug!(method = %method, path = %path, "route registered");
        self.routes.insert(
            (method.clone(), path),
            Route {
                pipeline: pipeline.clone(),
                handler: Arc::clone(handler),
            },
        );
    }

    /// Number of registered `(method, path)` entries, aliases included.
    #[must_use]
    pub fn route_count(&self) -> usize {
        self.routes.len()
    }

    /// Whether a route exists for exactly this method and path.
    #[must_use]
    pub fn has_route(&self, method: &Method, path: &str) -> bool {
        self.routes.contains_key(&(method.clone(), path.to_string()))
    }

    /// Dispatches a request.
    ///
    /// Unmatched requests never enter the pipeline. A path registered for
    /// other methods gets a 405 envelope with an `Allow` header; anything
    /// else gets a 404 envelope.
    /// An `Err` means the pipeline could not produce a response at all; it
    /// is logged here and the caller should drop the connection.
    pub async fn dispatch(&self, request: Request, remote_addr: Option<SocketAddr>) -> HandlerResult {
        let method = request.method().clone();
        let path = request.uri().path().to_string();

        let Some(route) = self.routes.get(&(method.clone(), path.clone())) else {
            return self.unmatched(&method, &path);
        };

        let ctx = MiddlewareContext::new(method, path).with_remote_addr(remote_addr);
        let trace_id = ctx.trace_id();
        let handler = Arc::clone(&route.handler);

        let result = route
            .pipeline
            .process(ctx, request, move |ctx, request| {
                handler(ctx.to_request_context(), request)
            })
            .await;

        match result {
            Ok(mut response) => {
                if let Ok(value) = HeaderValue::from_str(&trace_id.to_string()) {
                    response.headers_mut().insert(TRACE_ID_HEADER, value);
                }
                Ok(response)
            }
            Err(e) => {
                tracing::error!(trace_id = %trace_id, error = %e, "pipeline returned an error");
                Err(e)
            }
        }
    }
}

impl App {
    /// Methods registered for `path`, sorted.
    fn allowed_methods(&self, path: &str) -> Vec<&str> {
        let mut methods: Vec<&str> = self
            .routes
            .keys()
            .filter(|(_, p)| p == path)
            .map(|(m, _)| m.as_str())
            .collect();
        methods.sort_unstable();
        methods
    }

    fn unmatched(&self, method: &Method, path: &str) -> HandlerResult {
        let allowed = self.allowed_methods(path);

        if allowed.is_empty() {
            tracing::debug!(method = %method, path = %path, "no route matched");
            let error = ServiceError::not_found(format!("no route for {method} {path}"));
            return Response::from_service_error(&error, None);
        }

        let allow = allowed.join(", ");
        tracing::debug!(method = %method, path = %path, allow = %allow, "method not allowed");
        let error =
            ServiceError::method_not_allowed(format!("method {method} not allowed for {path}"));
        let mut response = Response::from_service_error(&error, None)?;
        if let Ok(value) = HeaderValue::from_str(&allow) {
            response.headers_mut().insert(ALLOW, value);
        }
        Ok(response)
    }
}

impl std::fmt::Debug for App {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut routes: Vec<String> = self
            .routes
            .keys()
            .map(|(method, path)| format!("{method} {path}"))
            .collect();
        routes.sort();

        f.debug_struct("App")
            .field("global", &self.global)
            .field("routes", &routes)
            .finish()
    }
}
