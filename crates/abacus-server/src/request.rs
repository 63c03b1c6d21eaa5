//! Request decoding helpers for handlers.

use abacus_core::{ServiceError, ServiceResult};
use abacus_middleware::Request;
use http_body_util::BodyExt;
use serde::de::DeserializeOwned;

/// Decodes the buffered request body as JSON.
///
/// Any failure, including an empty body, is a bad request.
pub async fn decode_json<T: DeserializeOwned>(request: Request) -> ServiceResult<T> {
    let bytes = match request.into_body().collect().await {
        Ok(collected) => collected.to_bytes(),
        Err(never) => match never {},
    };

    serde_json::from_slice(&bytes)
        .map_err(|e| ServiceError::bad_request(format!("failed to decode request body: {e}")))
}

/// Reads an integer query parameter.
///
/// Returns `default` when the key is absent, the query string does not
/// parse, or the first value for the key is not an integer.
#[must_use]
pub fn query_param_i64(request: &Request, key: &str, default: i64) -> i64 {
    let Some(query) = request.uri().query() else {
        return default;
    };

    serde_urlencoded::from_str::<Vec<(String, String)>>(query)
        .ok()
        .and_then(|pairs| pairs.into_iter().find(|(k, _)| k == key))
        .and_then(|(_, value)| value.parse().ok())
        .unwrap_or(default)
}
