//! Default downstream handler for verified webhooks.
//!
//! Acknowledges every verified event after checking that the body is a JSON
//! object, logging the event id and type when the sender includes them.

use std::future::Future;
use std::pin::Pin;

use bytes::Bytes;
use serde_json::{Map, Value};
use tracing::info;

use hookguard_http::response::json_response;
use hookguard_http::{WebhookError, WebhookHandler, WebhookResponseBody};

/// Acknowledges verified events with `{"received":true}`.
#[derive(Debug, Clone, Default)]
pub struct AckHandler;

impl WebhookHandler for AckHandler {
    fn handle(
        &self,
        request: http::Request<Bytes>,
    ) -> Pin<Box<dyn Future<Output = Result<http::Response<WebhookResponseBody>, WebhookError>> + Send>>
    {
        Box::pin(async move { acknowledge(request.body()) })
    }
}

fn acknowledge(body: &Bytes) -> Result<http::Response<WebhookResponseBody>, WebhookError> {
    // Only a JSON object deserializes into a `Map`; arrays and scalars fail here.
    let event: Map<String, Value> = serde_json::from_slice(body)
        .map_err(|e| WebhookError::invalid_payload(format!("request body is not a JSON object: {e}")))?;

    info!(
        event_id = envelope_field(&event, "event_id"),
        event_type = envelope_field(&event, "event_type"),
        "accepted webhook event"
    );

    let json = serde_json::to_vec(&serde_json::json!({ "received": true }))
        .map_err(|e| WebhookError::internal_error(e.to_string()))?;
    Ok(json_response(json))
}

/// A string envelope field, or `-` when absent or not a string.
fn envelope_field<'a>(event: &'a Map<String, Value>, key: &str) -> &'a str {
    event.get(key).and_then(Value::as_str).unwrap_or("-")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_should_acknowledge_json_event() {
        let body = Bytes::from_static(
            br#"{"event_id":"evt_01h","event_type":"subscription.created","data":{}}"#,
        );
        let resp = acknowledge(&body).unwrap();
        assert_eq!(resp.status(), http::StatusCode::OK);
    }

    #[test]
    fn test_should_acknowledge_event_without_envelope_fields() {
        let resp = acknowledge(&Bytes::from_static(br#"{"a":1}"#)).unwrap();
        assert_eq!(resp.status(), http::StatusCode::OK);
    }

    #[test]
    fn test_should_reject_non_json_body() {
        let err = acknowledge(&Bytes::from_static(b"not json")).unwrap_err();
        assert_eq!(err.status_code, http::StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_should_reject_json_that_is_not_an_object() {
        let bodies: [&'static [u8]; 6] = [
            b"[1,2,3]",
            b"[null,null]",
            br#"["a","b"]"#,
            br#"["evt_1","subscription.created"]"#,
            b"\"evt_1\"",
            b"null",
        ];
        for body in bodies {
            let err = acknowledge(&Bytes::from_static(body)).unwrap_err();
            assert_eq!(err.status_code, http::StatusCode::BAD_REQUEST, "{body:?}");
        }
    }

    #[test]
    fn test_should_read_string_envelope_fields_only() {
        let event: Map<String, Value> =
            serde_json::from_str(r#"{"event_id":"evt_1","event_type":42}"#).unwrap();
        assert_eq!(envelope_field(&event, "event_id"), "evt_1");
        assert_eq!(envelope_field(&event, "event_type"), "-");
        assert_eq!(envelope_field(&event, "occurred_at"), "-");
    }
}
