//! # Abacus Core
//!
//! Core types shared by every layer of the abacus calculation service.
//!
//! - [`TraceId`] - UUID v7 identifier assigned to every routed request
//! - [`RequestContext`] - Read-only view of the per-request context handed to handlers
//! - [`ServiceError`] - Typed failure returned by handlers and middleware
//! - [`ErrorEnvelope`] - Serializable error body written to clients

#![doc(html_root_url = "https://docs.rs/abacus-core/0.1.0")]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod context;
mod error;

pub use context::{RequestContext, TraceId};
pub use error::{
    ErrorCategory, ErrorDetail, ErrorEnvelope, ServiceError, ServiceResult, INTERNAL_ERROR_MESSAGE,
};
