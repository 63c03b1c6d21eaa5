//! # Abacus Calculator
//!
//! The arithmetic layer and its HTTP surface.
//!
//! - [`Calculator`] does the math: add, subtract, multiply, divide, each
//!   rounded half away from zero to a fixed precision.
//! - [`CalculatorService`] stamps each success with the current time and
//!   inserts it into the result store.
//! - [`v1_routes`] mounts the handlers under `/api/v1/calculator`.

#![warn(missing_docs)]
#![forbid(unsafe_code)]

pub mod calculator;
pub mod dto;
pub mod handlers;
pub mod routes;
pub mod service;

pub use calculator::{CalcError, Calculation, Calculator, Operation};
pub use handlers::CalculatorHandlers;
pub use routes::{v1_routes, V1_GROUP};
pub use service::CalculatorService;
