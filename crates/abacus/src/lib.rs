//! # Abacus
//!
//! An HTTP calculation service. Each successful addition, subtraction,
//! multiplication or division is recorded, and the history is served
//! newest first, a page at a time.
//!
//! This crate wires the pieces together:
//!
//! - [`global_pipeline`] fixes the middleware order: panic recovery,
//!   logging, error translation.
//! - [`build_app`] mounts `/healthz` and the calculator routes.
//! - [`run`] picks the store, serves until shutdown, and saves the store
//!   on the way out when persistence is on.
//!
//! ## Endpoints
//!
//! | Method | Path | Body |
//! |--------|------|------|
//! | GET | `/healthz` | |
//! | POST | `/api/v1/calculator/addition` | `{"summand_one", "summand_two"}` |
//! | POST | `/api/v1/calculator/subtraction` | `{"minuend", "subtrahend"}` |
//! | POST | `/api/v1/calculator/multiplication` | `{"factor_one", "factor_two"}` |
//! | POST | `/api/v1/calculator/division` | `{"dividend", "divisor"}` |
//! | GET | `/api/v1/calculator/recent?page=&page_size=` | |

#![warn(missing_docs)]
#![forbid(unsafe_code)]

use std::sync::Arc;

use abacus_config::AbacusConfig;
use abacus_core::RequestContext;
use abacus_middleware::stages::{
    ErrorTranslationMiddleware, LoggingMiddleware, PanicRecoveryMiddleware,
};
use abacus_middleware::{HandlerResult, Pipeline, Request, Response, ResponseExt};
use abacus_server::{App, Server, ServerConfig, ShutdownSignal};
use abacus_store::{JsonStore, MemoryStore, ResultStore};
use anyhow::Context;
use http::StatusCode;

pub use abacus_config as config;
pub use abacus_server as server;
pub use abacus_store as store;

/// The crate version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// The global middleware, outermost first.
#[must_use]
pub fn global_pipeline() -> Pipeline {
    Pipeline::builder()
        .add_stage(PanicRecoveryMiddleware::new())
        .add_stage(LoggingMiddleware::new())
        .add_stage(ErrorTranslationMiddleware::new())
        .build()
}

/// Builds the app with every route registered against `store`.
pub fn build_app<S>(precision: u32, store: Arc<S>) -> App
where
    S: ResultStore + 'static,
{
    let mut app = App::new(global_pipeline());
    app.get("", "/healthz", healthz);
    abacus_calculator::v1_routes(&mut app, precision, store);
    app
}

async fn healthz(_ctx: RequestContext, _request: Request) -> HandlerResult {
    Response::json(StatusCode::OK, &serde_json::json!({"status": "ok"}))
}

/// Translates the `[server]` section into the server runtime settings.
#[must_use]
pub fn server_config(config: &AbacusConfig) -> ServerConfig {
    ServerConfig::builder()
        .http_addr(config.server.http_addr.clone())
        .request_timeout(config.server.request_timeout())
        .shutdown_timeout(config.server.shutdown_timeout())
        .build()
}

/// Builds a server for `config` backed by `store`.
pub fn build_server<S>(config: &AbacusConfig, store: Arc<S>) -> Server
where
    S: ResultStore + 'static,
{
    Server::new(server_config(config), build_app(config.calculator.precision, store))
}

/// Runs the service until `shutdown` fires.
///
/// With persistence on, the snapshot is loaded first and a load failure
/// aborts before anything is served. After the server stops the snapshot
/// is saved; a save failure is logged and does not fail the run.
pub async fn run(config: &AbacusConfig, shutdown: ShutdownSignal) -> anyhow::Result<()> {
    if config.store.persist {
        tracing::info!(path = %config.store.path.display(), "using JSON store");
        let store = Arc::new(JsonStore::open(&config.store.path).with_context(|| {
            format!("failed to load store from {}", config.store.path.display())
        })?);

        let served = build_server(config, Arc::clone(&store))
            .run_with_shutdown(shutdown)
            .await;

        if let Err(e) = store.save() {
            tracing::error!(error = %e, "could not save store");
        }

        served.context("server error")?;
    } else {
        tracing::info!("using in-memory store");
        build_server(config, Arc::new(MemoryStore::new()))
            .run_with_shutdown(shutdown)
            .await
            .context("server error")?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use http::Method;

    #[test]
    fn test_pipeline_order() {
        assert_eq!(
            global_pipeline().stage_names(),
            vec!["panic_recovery", "logging", "error_translation"]
        );
    }

    #[test]
    fn test_routes_registered() {
        let app = build_app(4, Arc::new(MemoryStore::new()));
        assert!(app.has_route(&Method::GET, "/healthz"));
        for op in ["addition", "subtraction", "multiplication", "division"] {
            assert!(app.has_route(&Method::POST, &format!("/api/v1/calculator/{op}")));
        }
        assert!(app.has_route(&Method::GET, "/api/v1/calculator/recent"));
        assert_eq!(app.route_count(), 6);
    }

    #[test]
    fn test_server_config_from_file_config() {
        let mut config = AbacusConfig::default();
        config.server.http_addr = "0.0.0.0:9000".to_string();
        config.server.request_timeout_ms = 1_500;

        let server = server_config(&config);
        assert_eq!(server.http_addr(), "0.0.0.0:9000");
        assert_eq!(server.request_timeout().as_millis(), 1_500);
        assert_eq!(server.shutdown_timeout().as_secs(), 10);
    }
}
