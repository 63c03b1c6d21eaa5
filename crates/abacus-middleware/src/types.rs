//! Common types used throughout the middleware pipeline.

use abacus_core::{ServiceError, ServiceResult};
use bytes::Bytes;
use http::{header, StatusCode};
use http_body_util::Full;
use serde::Serialize;

/// The HTTP request type used in the middleware pipeline.
///
/// The body is fully buffered before the pipeline runs.
pub type Request = http::Request<Full<Bytes>>;

/// The HTTP response type used in the middleware pipeline.
pub type Response = http::Response<Full<Bytes>>;

/// What every stage and handler returns.
///
/// `Err` means no response has been written yet; the error translation
/// stage turns it into one.
pub type HandlerResult = ServiceResult<Response>;

/// Extension trait for building JSON responses.
pub trait ResponseExt: Sized {
    /// Creates a JSON response with the given status and body.
    fn json<T: Serialize + ?Sized>(status: StatusCode, body: &T) -> ServiceResult<Self>;

    /// Renders a [`ServiceError`] as the standard error envelope.
    fn from_service_error(error: &ServiceError, trace_id: Option<&str>) -> ServiceResult<Self>;
}

impl ResponseExt for Response {
    fn json<T: Serialize + ?Sized>(status: StatusCode, body: &T) -> ServiceResult<Self> {
        let bytes = serde_json::to_vec(body).map_err(|e| {
            ServiceError::internal_with_source("failed to serialize response body", e)
        })?;

        http::Response::builder()
            .status(status)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Full::new(Bytes::from(bytes)))
            .map_err(|e| ServiceError::internal_with_source("failed to build response", e))
    }

    fn from_service_error(error: &ServiceError, trace_id: Option<&str>) -> ServiceResult<Self> {
        Self::json(error.status_code(), &error.to_envelope(trace_id))
    }
}
