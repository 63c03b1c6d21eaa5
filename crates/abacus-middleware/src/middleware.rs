//! Core middleware trait and types.
//!
//! This module defines the [`Middleware`] trait that all stages implement.
//! A stage receives the mutable context, the request and a [`Next`] value
//! that runs the rest of the chain. It may act before and after calling
//! `next`, or return without calling it at all.
//!
//! # Example
//!
//! ```ignore
//! use abacus_middleware::{BoxFuture, HandlerResult, Middleware, MiddlewareContext, Next, Request};
//!
//! struct Timing;
//!
//! impl Middleware for Timing {
//!     fn name(&self) -> &'static str {
//!         "timing"
//!     }
//!
//!     fn process<'a>(
//!         &'a self,
//!         ctx: &'a mut MiddlewareContext,
//!         request: Request,
//!         next: Next<'a>,
//!     ) -> BoxFuture<'a, HandlerResult> {
//!         Box::pin(async move {
//!             let result = next.run(ctx, request).await;
//!             tracing::debug!(elapsed = ?ctx.elapsed(), "timing");
//!             result
//!         })
//!     }
//! }
//! ```

use crate::context::MiddlewareContext;
use crate::types::{HandlerResult, Request};
use std::future::Future;
use std::pin::Pin;

/// A boxed, sendable future.
pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// The core middleware trait.
///
/// # Invariants
///
/// - A stage calls `next.run()` at most once
/// - A stage never swallows an error it does not handle
pub trait Middleware: Send + Sync + 'static {
    /// Returns the name of this stage, used in logs and tests.
    fn name(&self) -> &'static str;

    /// Processes the request through this stage.
    fn process<'a>(
        &'a self,
        ctx: &'a mut MiddlewareContext,
        request: Request,
        next: Next<'a>,
    ) -> BoxFuture<'a, HandlerResult>;
}

/// The terminal handler at the end of a chain.
pub type TerminalHandler<'a> =
    Box<dyn FnOnce(&mut MiddlewareContext, Request) -> BoxFuture<'static, HandlerResult> + Send + 'a>;

/// Callback to invoke the rest of the chain.
///
/// `run` consumes `self`, so the remaining chain can only be entered once.
pub struct Next<'a> {
    inner: NextInner<'a>,
}

enum NextInner<'a> {
    Chain {
        middleware: &'a dyn Middleware,
        next: Box<Next<'a>>,
    },
    Handler(TerminalHandler<'a>),
}

impl<'a> Next<'a> {
    /// Creates a `Next` that invokes `middleware`, which in turn gets `next`.
    pub(crate) fn new(middleware: &'a dyn Middleware, next: Next<'a>) -> Self {
        Self {
            inner: NextInner::Chain {
                middleware,
                next: Box::new(next),
            },
        }
    }

    /// Creates a terminal `Next` that invokes the handler.
    pub fn handler<F>(f: F) -> Self
    where
        F: FnOnce(&mut MiddlewareContext, Request) -> BoxFuture<'static, HandlerResult> + Send + 'a,
    {
        Self {
            inner: NextInner::Handler(Box::new(f)),
        }
    }

    /// Invokes the next middleware or the handler.
    pub async fn run(self, ctx: &mut MiddlewareContext, request: Request) -> HandlerResult {
        match self.inner {
            NextInner::Chain { middleware, next } => middleware.process(ctx, request, *next).await,
            NextInner::Handler(handler) => handler(ctx, request).await,
        }
    }
}
