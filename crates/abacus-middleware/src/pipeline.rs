//! Ordered middleware pipeline.
//!
//! A [`Pipeline`] is an immutable list of stages composed right-to-left
//! around a terminal handler: the first stage added is the outermost one.
//! The order is fixed once [`PipelineBuilder::build`] returns.

use crate::context::MiddlewareContext;
use crate::middleware::{BoxFuture, Middleware, Next};
use crate::types::{HandlerResult, Request};
use std::sync::Arc;

/// A type-erased middleware that can be stored in a vector.
pub type BoxedMiddleware = Arc<dyn Middleware>;

/// An ordered, immutable middleware pipeline.
///
/// # Example
///
/// ```ignore
/// let pipeline = Pipeline::builder()
///     .add_stage(PanicRecoveryMiddleware::new())
///     .add_stage(LoggingMiddleware::new())
///     .build();
///
/// let result = pipeline.process(ctx, request, handler).await;
/// ```
#[derive(Clone, Default)]
pub struct Pipeline {
    stages: Vec<BoxedMiddleware>,
}

impl Pipeline {
    /// Creates a new pipeline builder.
    #[must_use]
    pub fn builder() -> PipelineBuilder {
        PipelineBuilder::new()
    }

    /// Runs a request through every stage, then the handler.
    pub async fn process<H>(
        &self,
        mut ctx: MiddlewareContext,
        request: Request,
        handler: H,
    ) -> HandlerResult
    where
        H: FnOnce(&mut MiddlewareContext, Request) -> BoxFuture<'static, HandlerResult>
            + Send
            + 'static,
    {
        self.run(&mut ctx, request, handler).await
    }

    /// Like [`process`](Self::process), but leaves the context with the
    /// caller so it can be inspected afterwards.
    pub async fn run<H>(
        &self,
        ctx: &mut MiddlewareContext,
        request: Request,
        handler: H,
    ) -> HandlerResult
    where
        H: FnOnce(&mut MiddlewareContext, Request) -> BoxFuture<'static, HandlerResult>
            + Send
            + 'static,
    {
        self.build_chain(handler).run(ctx, request).await
    }

    /// Builds the chain from back to front.
    fn build_chain<'a, H>(&'a self, handler: H) -> Next<'a>
    where
        H: FnOnce(&mut MiddlewareContext, Request) -> BoxFuture<'static, HandlerResult> + Send + 'a,
    {
        let mut next = Next::handler(handler);
        for middleware in self.stages.iter().rev() {
            next = Next::new(middleware.as_ref(), next);
        }
        next
    }

    /// Returns the names of all stages, outermost first.
    #[must_use]
    pub fn stage_names(&self) -> Vec<&'static str> {
        self.stages.iter().map(|mw| mw.name()).collect()
    }

    /// Returns the number of stages.
    #[must_use]
    pub fn stage_count(&self) -> usize {
        self.stages.len()
    }

    /// Returns a new pipeline with `inner` appended after this one's stages.
    ///
    /// Used to put route-specific middleware inside the global stages.
    #[must_use]
    pub fn extend(&self, inner: impl IntoIterator<Item = BoxedMiddleware>) -> Self {
        let mut stages = self.stages.clone();
        stages.extend(inner);
        Self { stages }
    }
}

impl std::fmt::Debug for Pipeline {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Pipeline")
            .field("stages", &self.stage_names())
            .finish()
    }
}

/// Builder for constructing a [`Pipeline`].
#[derive(Default)]
pub struct PipelineBuilder {
    stages: Vec<BoxedMiddleware>,
}

impl PipelineBuilder {
    /// Creates an empty builder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a stage. Earlier stages wrap later ones.
    #[must_use]
    pub fn add_stage<M: Middleware>(mut self, middleware: M) -> Self {
        self.stages.push(Arc::new(middleware));
        self
    }

    /// Appends an already shared stage.
    #[must_use]
    pub fn add_boxed_stage(mut self, middleware: BoxedMiddleware) -> Self {
        self.stages.push(middleware);
        self
    }

    /// Builds the pipeline.
    #[must_use]
    pub fn build(self) -> Pipeline {
        Pipeline {
            stages: self.stages,
        }
    }
}
