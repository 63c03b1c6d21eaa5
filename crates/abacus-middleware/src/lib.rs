//! # Abacus Middleware
//!
//! Ordered middleware pipeline for the abacus calculation service.
//!
//! Every routed request flows through the same global stages before the
//! route's own middleware and its terminal handler:
//!
//! ```text
//! Request → PanicRecovery → Logging → ErrorTranslation → [route mw] → Handler
//!                                                                       ↓
//! Response ← PanicRecovery ← Logging ← ErrorTranslation ←──────────────┘
//! ```
//!
//! | Stage | Middleware         | Purpose                                        |
//! |-------|--------------------|------------------------------------------------|
//! | 1     | Panic Recovery     | Turn a downstream panic into a 500 response     |
//! | 2     | Logging            | `request started` / `request finished` events  |
//! | 3     | Error Translation  | Render `ServiceError`s as the JSON envelope    |
//!
//! Stages communicate through the mutable [`MiddlewareContext`]: error
//! translation records the final status code, and logging reads it back on
//! the way out.
//!
//! ## Example
//!
//! ```
//! use abacus_middleware::pipeline::Pipeline;
//! use abacus_middleware::stages::{ErrorTranslationMiddleware, LoggingMiddleware, PanicRecoveryMiddleware};
//!
//! let pipeline = Pipeline::builder()
//!     .add_stage(PanicRecoveryMiddleware::new())
//!     .add_stage(LoggingMiddleware::new())
//!     .add_stage(ErrorTranslationMiddleware::new())
//!     .build();
//!
//! assert_eq!(pipeline.stage_names(), vec!["panic_recovery", "logging", "error_translation"]);
//! ```

#![warn(missing_docs)]
#![forbid(unsafe_code)]

pub mod context;
pub mod middleware;
pub mod pipeline;
pub mod stages;
pub mod types;

pub use context::MiddlewareContext;
pub use middleware::{BoxFuture, Middleware, Next};
pub use pipeline::{BoxedMiddleware, Pipeline, PipelineBuilder};
pub use types::{HandlerResult, Request, Response, ResponseExt};
