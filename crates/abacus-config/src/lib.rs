//! # Abacus Config
//!
//! Typed configuration for the abacus service.
//!
//! Sources are layered, later ones winning:
//!
//! 1. Built-in defaults
//! 2. A TOML or JSON file, chosen by extension
//! 3. `ABACUS__SECTION__KEY` environment variables (optionally from `.env`)
//!
//! Every section rejects unknown keys, and the result is validated before
//! it is returned.
//!
//! ```toml
//! [server]
//! http_addr = "127.0.0.1:8080"
//! request_timeout_ms = 5000
//! shutdown_timeout_secs = 10
//!
//! [store]
//! persist = true
//! path = "./results.json"
//!
//! [calculator]
//! precision = 4
//!
//! [logging]
//! level = "info"
//! format = "json"
//! ```

#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod config;
mod error;
mod loader;
mod schema;

pub use config::AbacusConfig;
pub use error::ConfigError;
pub use loader::{ConfigLoader, ENV_PREFIX};
pub use schema::{
    CalculatorConfig, LoggingConfig, ServerConfig, StoreConfig, MAX_PRECISION,
};
