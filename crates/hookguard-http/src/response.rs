//! Webhook response formatting.

use crate::body::WebhookResponseBody;
use crate::error::WebhookError;

/// Content type for JSON responses.
pub const CONTENT_TYPE: &str = "application/json";

/// Serialize a webhook error into a JSON body.
///
/// ```json
/// { "error": "InvalidPayload", "message": "request body is not valid JSON" }
/// ```
#[must_use]
pub fn error_to_json(error: &WebhookError) -> Vec<u8> {
    serde_json::to_vec(&serde_json::json!({
        "error": error.code.as_str(),
        "message": error.message,
    }))
    .expect("JSON serialization of error cannot fail")
}

/// Convert a `WebhookError` into a complete HTTP error response.
#[must_use]
pub fn error_to_response(error: &WebhookError) -> http::Response<WebhookResponseBody> {
    http::Response::builder()
        .status(error.status_code)
        .header("content-type", CONTENT_TYPE)
        .body(WebhookResponseBody::from_bytes(error_to_json(error)))
        .expect("valid error response")
}

/// The response for a rejected signature: `401` with no body, so nothing
/// about the failure is revealed to the sender.
#[must_use]
pub fn unauthorized_response() -> http::Response<WebhookResponseBody> {
    http::Response::builder()
        .status(http::StatusCode::UNAUTHORIZED)
        .body(WebhookResponseBody::empty())
        .expect("valid unauthorized response")
}

/// Build a success response from JSON bytes.
#[must_use]
pub fn json_response(json: Vec<u8>) -> http::Response<WebhookResponseBody> {
    http::Response::builder()
        .status(http::StatusCode::OK)
        .header("content-type", CONTENT_TYPE)
        .body(WebhookResponseBody::from_bytes(json))
        .expect("valid JSON response")
}
