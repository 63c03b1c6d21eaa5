//! Version 1 calculator routes.

use std::future::Future;
use std::sync::Arc;

use abacus_core::RequestContext;
use abacus_middleware::{HandlerResult, Request};
use abacus_server::App;
use abacus_store::ResultStore;

use crate::handlers::CalculatorHandlers;
use crate::service::CalculatorService;

/// Route group for every calculator endpoint.
pub const V1_GROUP: &str = "api/v1/calculator";

/// Registers the calculator endpoints under [`V1_GROUP`].
///
/// Results are written to and read from the same `store`.
pub fn v1_routes<S>(app: &mut App, precision: u32, store: Arc<S>)
where
    S: ResultStore + 'static,
{
    let sink: Arc<S> = Arc::clone(&store);
    let service = CalculatorService::new(precision, sink);
    let handlers = Arc::new(CalculatorHandlers::new(service, store));

    app.post(V1_GROUP, "/addition", bind(&handlers, CalculatorHandlers::addition));
    app.post(V1_GROUP, "/subtraction", bind(&handlers, CalculatorHandlers::subtraction));
    app.post(V1_GROUP, "/multiplication", bind(&handlers, CalculatorHandlers::multiplication));
    app.post(V1_GROUP, "/division", bind(&handlers, CalculatorHandlers::division));
    app.get(V1_GROUP, "/recent", bind(&handlers, CalculatorHandlers::recent));
}

fn bind<F, Fut>(
    handlers: &Arc<CalculatorHandlers>,
    method: F,
) -> impl Fn(RequestContext, Request) -> Fut + Send + Sync + 'static
where
    F: Fn(Arc<CalculatorHandlers>, RequestContext, Request) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = HandlerResult> + Send + 'static,
{
    let handlers = Arc::clone(handlers);
    move |ctx, request| method(Arc::clone(&handlers), ctx, request)
}
