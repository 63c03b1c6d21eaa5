//! Runtime settings for [`Server`](crate::Server).
//!
//! # Example
//!
//! ```rust
//! use abacus_server::ServerConfig;
//! use std::time::Duration;
//!
//! let config = ServerConfig::builder()
//!     .http_addr("0.0.0.0:8080")
//!     .request_timeout(Duration::from_secs(2))
//!     .build();
//!
//! assert_eq!(config.http_addr(), "0.0.0.0:8080");
//! ```

use std::net::SocketAddr;
use std::time::Duration;

/// Address bound when none is configured.
pub const DEFAULT_HTTP_ADDR: &str = "127.0.0.1:8080";

/// Milliseconds allowed for body read plus dispatch.
pub const DEFAULT_REQUEST_TIMEOUT_MS: u64 = 5_000;

/// Seconds to wait for open connections after shutdown begins.
pub const DEFAULT_SHUTDOWN_TIMEOUT_SECS: u64 = 10;

/// Bind address and the two deadlines the accept loop enforces.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// HTTP bind address (e.g. "127.0.0.1:8080")
    http_addr: String,

    /// Deadline for reading the body and running the pipeline
    request_timeout: Duration,

    /// How long to wait for in-flight connections on shutdown
    shutdown_timeout: Duration,
}

impl ServerConfig {
    /// Starts a builder populated with the defaults.
    #[must_use]
    pub fn builder() -> ServerConfigBuilder {
        ServerConfigBuilder::default()
    }

    /// The address to bind, unparsed.
    #[must_use]
    pub fn http_addr(&self) -> &str {
        &self.http_addr
    }

    /// The bind address parsed as a [`SocketAddr`].
    pub fn socket_addr(&self) -> Result<SocketAddr, std::net::AddrParseError> {
        self.http_addr.parse()
    }

    /// Deadline for one request.
    #[must_use]
    pub fn request_timeout(&self) -> Duration {
        self.request_timeout
    }

    /// Drain deadline on shutdown.
    #[must_use]
    pub fn shutdown_timeout(&self) -> Duration {
        self.shutdown_timeout
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self::builder().build()
    }
}

/// Collects [`ServerConfig`] fields.
#[derive(Debug, Clone)]
pub struct ServerConfigBuilder {
    http_addr: String,
    request_timeout: Duration,
    shutdown_timeout: Duration,
}

impl ServerConfigBuilder {
    /// Same as [`ServerConfig::builder`].
    #[must_use]
    pub fn new() -> Self {
        Self {
            http_addr: DEFAULT_HTTP_ADDR.to_string(),
            request_timeout: Duration::from_millis(DEFAULT_REQUEST_TIMEOUT_MS),
            shutdown_timeout: Duration::from_secs(DEFAULT_SHUTDOWN_TIMEOUT_SECS),
        }
    }

    /// Overrides the bind address.
    #[must_use]
    pub fn http_addr(mut self, addr: impl Into<String>) -> Self {
        self.http_addr = addr.into();
        self
    }

    /// Overrides the request deadline.
    #[must_use]
    pub fn request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    /// Overrides the drain deadline.
    #[must_use]
    pub fn shutdown_timeout(mut self, timeout: Duration) -> Self {
        self.shutdown_timeout = timeout;
        self
    }

    /// Finishes the builder.
    #[must_use]
    pub fn build(self) -> ServerConfig {
        ServerConfig {
            http_addr: self.http_addr,
            request_timeout: self.request_timeout,
            shutdown_timeout: self.shutdown_timeout,
        }
    }
}

impl Default for ServerConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = ServerConfig::default();
        assert_eq!(config.http_addr(), DEFAULT_HTTP_ADDR);
        assert_eq!(config.request_timeout(), Duration::from_secs(5));
        assert_eq!(config.shutdown_timeout(), Duration::from_secs(10));
    }

    #[test]
    fn test_builder_overrides() {
        let config = ServerConfig::builder()
            .http_addr("0.0.0.0:9090")
            .request_timeout(Duration::from_millis(250))
            .shutdown_timeout(Duration::from_secs(1))
            .build();

        assert_eq!(config.socket_addr().unwrap().port(), 9090);
        assert_eq!(config.request_timeout(), Duration::from_millis(250));
        assert_eq!(config.shutdown_timeout(), Duration::from_secs(1));
    }

    #[test]
    fn test_invalid_socket_addr() {
        let config = ServerConfig::builder().http_addr("not-an-address").build();
        assert!(config.socket_addr().is_err());
    }
}
