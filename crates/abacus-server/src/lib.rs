//! # Abacus Server
//!
//! Routing and the HTTP runtime for the abacus calculation service.
//!
//! - [`App`] binds `(method, path)` pairs to handlers wrapped in the
//!   global middleware plus any route-specific middleware, and dispatches
//!   requests to them.
//! - [`Server`] runs a hyper HTTP/1.1 accept loop on tokio, applies the
//!   request timeout, and shuts down gracefully on SIGINT/SIGTERM.
//! - [`request`] holds the small decoding helpers handlers use.
//!
//! ## Example
//!
//! ```rust,ignore
//! use abacus_server::{App, Server, ServerConfig};
//! use abacus_middleware::{Response, ResponseExt};
//! use http::StatusCode;
//!
//! let mut app = App::new(global_pipeline);
//! app.get("", "/healthz", |_ctx, _req| async {
//!     Response::json(StatusCode::OK, &serde_json::json!({"status": "ok"}))
//! });
//!
//! Server::new(ServerConfig::default(), app).run().await?;
//! ```

#![warn(missing_docs)]
#![forbid(unsafe_code)]

pub mod app;
pub mod config;
pub mod error;
pub mod request;
pub mod server;
pub mod shutdown;

pub use app::{App, Handler, TRACE_ID_HEADER};
pub use config::{ServerConfig, ServerConfigBuilder};
pub use error::ServerError;
pub use server::Server;
pub use shutdown::{ConnectionToken, ConnectionTracker, ShutdownSignal};
