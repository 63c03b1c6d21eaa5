//! HTTP server implementation.
//!
//! Accepts TCP connections, serves each one with hyper's HTTP/1.1
//! connection driver on its own task, and hands every request to the
//! [`App`]. Body collection and dispatch run under the configured request
//! timeout.
//!
//! # Example
//!
//! ```rust,ignore
//! use abacus_server::{App, Server, ServerConfig};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = ServerConfig::builder().http_addr("0.0.0.0:8080").build();
//!     Server::new(config, app).run().await?;
//!     Ok(())
//! }
//! ```

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use abacus_core::ServiceError;
use abacus_middleware::{HandlerResult, Response, ResponseExt};
use http_body_util::{BodyExt, Full};
use hyper::body::Incoming;
use hyper::server::conn::http1;
use hyper::service::service_fn;
use hyper_util::rt::TokioIo;
use tokio::net::{TcpListener, TcpStream};

use crate::app::App;
use crate::config::ServerConfig;
use crate::error::ServerError;
use crate::shutdown::{ConnectionTracker, ShutdownSignal};

/// The abacus HTTP server.
pub struct Server {
    config: ServerConfig,
    app: Arc<App>,
}

impl Server {
    /// Creates a server that dispatches to `app`.
    #[must_use]
    pub fn new(config: ServerConfig, app: App) -> Self {
        Self {
            config,
            app: Arc::new(app),
        }
    }

    /// Returns the server configuration.
    #[must_use]
    pub fn config(&self) -> &ServerConfig {
        &self.config
    }

    /// Runs until SIGINT or SIGTERM.
    pub async fn run(self) -> Result<(), ServerError> {
        let shutdown = ShutdownSignal::with_os_signals();
        self.run_with_shutdown(shutdown).await
    }

    /// Binds the configured address and runs until `shutdown` fires.
    pub async fn run_with_shutdown(self, shutdown: ShutdownSignal) -> Result<(), ServerError> {
        let addr = self
            .config
            .socket_addr()
            .map_err(|source| ServerError::InvalidAddress {
                addr: self.config.http_addr().to_string(),
                source,
            })?;

        let listener = TcpListener::bind(addr)
            .await
            .map_err(|source| ServerError::Bind { addr, source })?;

        self.run_with_listener(listener, shutdown).await
    }

    /// Serves connections from an already bound listener until `shutdown`
    /// fires, then waits up to the shutdown timeout for them to finish.
    pub async fn run_with_listener(
        self,
        listener: TcpListener,
        shutdown: ShutdownSignal,
    ) -> Result<(), ServerError> {
        let local_addr = listener.local_addr()?;
        tracing::info!(address = %local_addr, "server listening");

        let tracker = ConnectionTracker::new();
        let request_timeout = self.config.request_timeout();

        loop {
            tokio::select! {
                result = listener.accept() => {
                    match result {
                        Ok((stream, remote_addr)) => {
                            let app = Arc::clone(&self.app);
                            let token = tracker.acquire();
                            let shutdown = shutdown.clone();

                            tokio::spawn(async move {
                                if let Err(e) = handle_connection(app, stream, remote_addr, request_timeout, shutdown).await {
                                    tracing::warn!(remote_addr = %remote_addr, error = %e, "connection closed with error");
                                }
                                drop(token);
                            });
                        }
                        Err(e) => {
                            tracing::error!(error = %e, "failed to accept connection");
                        }
                    }
                }

                () = shutdown.recv() => {
                    tracing::info!("shutdown signal received, no longer accepting connections");
                    break;
                }
            }
        }

        let shutdown_timeout = self.config.shutdown_timeout();
        tracing::info!(
            active = tracker.active_connections(),
            timeout_secs = shutdown_timeout.as_secs_f64(),
            "waiting for in-flight connections"
        );

        tokio::select! {
            () = tracker.wait_for_drain() => {
                tracing::info!("all connections closed");
            }
            () = tokio::time::sleep(shutdown_timeout) => {
                tracing::warn!(
                    active = tracker.active_connections(),
                    "shutdown timeout reached with connections still open"
                );
            }
        }

        tracing::info!("server stopped");
        Ok(())
    }
}

impl std::fmt::Debug for Server {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Server")
            .field("config", &self.config)
            .field("app", &self.app)
            .finish()
    }
}

async fn handle_connection(
    app: Arc<App>,
    stream: TcpStream,
    remote_addr: SocketAddr,
    request_timeout: Duration,
    shutdown: ShutdownSignal,
) -> Result<(), hyper::Error> {
    let io = TokioIo::new(stream);

    let service = service_fn(move |request: http::Request<Incoming>| {
        let app = Arc::clone(&app);
        async move { handle_request(&app, request, remote_addr, request_timeout).await }
    });

    let conn = http1::Builder::new().serve_connection(io, service);
    tokio::pin!(conn);

    tokio::select! {
        result = conn.as_mut() => result,
        () = shutdown.recv() => {
            tracing::debug!(remote_addr = %remote_addr, "finishing connection for shutdown");
            conn.as_mut().graceful_shutdown();
            conn.await
        }
    }
}

/// Collects the body and dispatches under the request timeout.
///
/// An `Err` makes hyper close the connection without a response.
async fn handle_request(
    app: &App,
    request: http::Request<Incoming>,
    remote_addr: SocketAddr,
    request_timeout: Duration,
) -> HandlerResult {
    let work = async {
        let (parts, body) = request.into_parts();
        let bytes = match body.collect().await {
            Ok(collected) => collected.to_bytes(),
            Err(e) => {
                tracing::warn!(remote_addr = %remote_addr, error = %e, "failed to read request body");
                let error = ServiceError::bad_request(format!("failed to read request body: {e}"));
                return Response::from_service_error(&error, None);
            }
        };

        let request = http::Request::from_parts(parts, Full::new(bytes));
        app.dispatch(request, Some(remote_addr)).await
    };

    match tokio::time::timeout(request_timeout, work).await {
        Ok(result) => result,
        Err(_) => {
            tracing::warn!(
                remote_addr = %remote_addr,
                timeout_ms = request_timeout.as_millis() as u64,
                "request timed out"
            );
            Response::from_service_error(&ServiceError::timeout("request timed out"), None)
        }
    }
}
