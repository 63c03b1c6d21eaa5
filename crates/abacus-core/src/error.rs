//! Error types for abacus.
//!
//! [`ServiceError`] is the failure type every handler and middleware stage
//! returns. Errors fall in two groups:
//!
//! - **Known** errors (`BadRequest`, `NotFound`, `MethodNotAllowed`,
//!   `Timeout`) carry a message
//!   that is safe to show to the caller verbatim.
//! - **Internal** errors carry an optional source that is logged server-side
//!   and never serialized; callers only ever see [`INTERNAL_ERROR_MESSAGE`].

use http::StatusCode;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Result type alias using [`ServiceError`].
pub type ServiceResult<T> = Result<T, ServiceError>;

/// The message sent to callers for every internal failure.
pub const INTERNAL_ERROR_MESSAGE: &str = "There was an internal server error";

/// Categories of errors for classification and status mapping.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCategory {
    /// Malformed input or a rejected domain operation.
    BadRequest,
    /// No route or resource matched.
    NotFound,
    /// The path exists but not for this method.
    MethodNotAllowed,
    /// The request did not finish within its deadline.
    Timeout,
    /// Anything unexpected, including recovered panics.
    Internal,
}

impl ErrorCategory {
    /// Returns the default HTTP status code for this category.
    #[must_use]
    pub const fn default_status_code(&self) -> StatusCode {
        match self {
            Self::BadRequest => StatusCode::BAD_REQUEST,
            Self::NotFound => StatusCode::NOT_FOUND,
            Self::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
            Self::Timeout => StatusCode::SERVICE_UNAVAILABLE,
            Self::Internal => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Returns the machine-readable code used in the error envelope.
    #[must_use]
    pub const fn code(&self) -> &'static str {
        match self {
            Self::BadRequest => "BAD_REQUEST",
            Self::NotFound => "NOT_FOUND",
            Self::MethodNotAllowed => "METHOD_NOT_ALLOWED",
            Self::Timeout => "TIMEOUT",
            Self::Internal => "INTERNAL_ERROR",
        }
    }
}

/// Standard error type for abacus.
///
/// # Example
///
/// ```
/// use abacus_core::ServiceError;
/// use http::StatusCode;
///
/// let err = ServiceError::bad_request("division by zero");
/// assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
/// assert_eq!(err.public_message(), "division by zero");
/// ```
#[derive(Error, Debug)]
pub enum ServiceError {
    /// The caller sent something the service cannot act on.
    #[error("{message}")]
    BadRequest {
        /// Caller-facing message.
        message: String,
    },

    /// Nothing is registered for the requested resource.
    #[error("{message}")]
    NotFound {
        /// Caller-facing message.
        message: String,
    },

    /// The path is registered, but not for the request's method.
    #[error("{message}")]
    MethodNotAllowed {
        /// Caller-facing message.
        message: String,
    },

    /// The request ran past its deadline.
    #[error("{message}")]
    Timeout {
        /// Caller-facing message.
        message: String,
    },

    /// Internal failure. The message and source stay server-side.
    #[error("internal error: {message}")]
    Internal {
        /// Server-side description.
        message: String,
        /// The underlying error, if any.
        #[source]
        source: Option<anyhow::Error>,
    },
}

impl ServiceError {
    /// Creates a bad request error.
    #[must_use]
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::BadRequest {
            message: message.into(),
        }
    }

    /// Creates a not found error.
    #[must_use]
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound {
            message: message.into(),
        }
    }

    /// Creates a method not allowed error.
    #[must_use]
    pub fn method_not_allowed(message: impl Into<String>) -> Self {
        Self::MethodNotAllowed {
            message: message.into(),
        }
    }

    /// Creates a timeout error.
    #[must_use]
    pub fn timeout(message: impl Into<String>) -> Self {
        Self::Timeout {
            message: message.into(),
        }
    }

    /// Creates an internal error.
    #[must_use]
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
            source: None,
        }
    }

    /// Creates an internal error wrapping a source error.
    pub fn internal_with_source(
        message: impl Into<String>,
        source: impl Into<anyhow::Error>,
    ) -> Self {
        Self::Internal {
            message: message.into(),
            source: Some(source.into()),
        }
    }

    /// Returns the error category.
    #[must_use]
    pub const fn category(&self) -> ErrorCategory {
        match self {
            Self::BadRequest { .. } => ErrorCategory::BadRequest,
            Self::NotFound { .. } => ErrorCategory::NotFound,
            Self::MethodNotAllowed { .. } => ErrorCategory::MethodNotAllowed,
            Self::Timeout { .. } => ErrorCategory::Timeout,
            Self::Internal { .. } => ErrorCategory::Internal,
        }
    }

    /// Returns the HTTP status code for this error.
    #[must_use]
    pub const fn status_code(&self) -> StatusCode {
        self.category().default_status_code()
    }

    /// Returns `true` if the message may be shown to the caller.
    #[must_use]
    pub const fn is_known(&self) -> bool {
        !matches!(self, Self::Internal { .. })
    }

    /// Returns the message that is safe to send to the caller.
    #[must_use]
    pub fn public_message(&self) -> String {
        if self.is_known() {
            self.to_string()
        } else {
            INTERNAL_ERROR_MESSAGE.to_string()
        }
    }

    /// Converts this error into the serializable envelope.
    #[must_use]
    pub fn to_envelope(&self, trace_id: Option<&str>) -> ErrorEnvelope {
        ErrorEnvelope {
            error: ErrorDetail {
                code: self.category().code().to_string(),
                message: self.public_message(),
            },
            trace_id: trace_id.map(ToString::to_string),
        }
    }
}

/// Serializable error envelope for HTTP responses.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorEnvelope {
    /// The error details.
    pub error: ErrorDetail,
    /// Trace ID for correlating with server logs.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub trace_id: Option<String>,
}

/// Error detail within an envelope.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorDetail {
    /// Machine-readable error code.
    pub code: String,
    /// Human-readable error message.
    pub message: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bad_request_is_known() {
        let error = ServiceError::bad_request("division by zero");
        assert_eq!(error.category(), ErrorCategory::BadRequest);
        assert_eq!(error.status_code(), StatusCode::BAD_REQUEST);
        assert!(error.is_known());
        assert_eq!(error.public_message(), "division by zero");
    }

    #[test]
    fn test_internal_error_hides_message() {
        let error = ServiceError::internal("database exploded");
        assert_eq!(error.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
        assert!(!error.is_known());
        assert_eq!(error.public_message(), INTERNAL_ERROR_MESSAGE);
        assert!(error.to_string().contains("database exploded"));
    }

    #[test]
    fn test_internal_with_source_keeps_chain() {
        let io = std::io::Error::new(std::io::ErrorKind::Other, "disk full");
        let error = ServiceError::internal_with_source("write failed", io);

        let source = std::error::Error::source(&error).expect("source should be kept");
        assert!(source.to_string().contains("disk full"));
    }

    #[test]
    fn test_timeout_maps_to_service_unavailable() {
        let error = ServiceError::timeout("request timed out");
        assert_eq!(error.status_code(), StatusCode::SERVICE_UNAVAILABLE);
    }

    #[test]
    fn test_method_not_allowed_is_known() {
        let error = ServiceError::method_not_allowed("method GET not allowed");
        assert_eq!(error.status_code(), StatusCode::METHOD_NOT_ALLOWED);
        assert_eq!(error.category().code(), "METHOD_NOT_ALLOWED");
        assert_eq!(error.public_message(), "method GET not allowed");
    }

    #[test]
    fn test_envelope_serialization() {
        let error = ServiceError::not_found("no route for GET /nope");
        let envelope = error.to_envelope(Some("trace-1"));

        let json = serde_json::to_value(&envelope).unwrap();
        assert_eq!(json["error"]["code"], "NOT_FOUND");
        assert_eq!(json["error"]["message"], "no route for GET /nope");
        assert_eq!(json["trace_id"], "trace-1");
    }

    #[test]
    fn test_envelope_never_leaks_internal_detail() {
        let error = ServiceError::internal("secret connection string");
        let json = serde_json::to_string(&error.to_envelope(None)).unwrap();

        assert!(!json.contains("secret"));
        assert!(!json.contains("trace_id"));
        assert!(json.contains(INTERNAL_ERROR_MESSAGE));
    }

    #[test]
    fn test_all_categories_map_to_error_status() {
        for category in [
            ErrorCategory::BadRequest,
            ErrorCategory::NotFound,
            ErrorCategory::MethodNotAllowed,
            ErrorCategory::Timeout,
            ErrorCategory::Internal,
        ] {
            let status = category.default_status_code();
            assert!(status.is_client_error() || status.is_server_error());
        }
    }
}
