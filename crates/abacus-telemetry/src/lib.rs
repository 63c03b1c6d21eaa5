//! # Abacus Telemetry
//!
//! Installs the global `tracing` subscriber: an [`EnvFilter`] built from the
//! configured level and a `fmt` layer writing JSON or pretty output.
//!
//! ```rust,ignore
//! use abacus_telemetry::{init_logging, LogConfig};
//!
//! init_logging(&LogConfig::production())?;
//! tracing::info!(address = "127.0.0.1:8080", "server listening");
//! ```
//!
//! [`EnvFilter`]: tracing_subscriber::EnvFilter

#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod error;
pub mod logging;

pub use error::{TelemetryError, TelemetryResult};
pub use logging::{create_env_filter, init_logging, LogConfig, LogFormat};
