//! Server error types.

use thiserror::Error;

/// Errors that stop the server from running.
#[derive(Debug, Error)]
pub enum ServerError {
    /// The configured bind address does not parse.
    #[error("invalid address '{addr}': {source}")]
    InvalidAddress {
        /// The address as configured.
        addr: String,
        /// The parse error.
        #[source]
        source: std::net::AddrParseError,
    },

    /// Binding the listener failed.
    #[error("failed to bind to {addr}: {source}")]
    Bind {
        /// The address that could not be bound.
        addr: std::net::SocketAddr,
        /// The underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// Any other listener I/O failure.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
