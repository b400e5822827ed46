//! Webhook handler trait and dispatch.

use std::future::Future;
use std::pin::Pin;

use bytes::Bytes;

use crate::body::WebhookResponseBody;
use crate::error::WebhookError;

/// Trait that the downstream event processor must implement.
///
/// The handler only ever sees requests whose signature was accepted. The body
/// is the same buffer the signature was computed over.
pub trait WebhookHandler: Send + Sync + 'static {
    /// Handle a verified webhook and produce an HTTP response.
    fn handle(
        &self,
        request: http::Request<Bytes>,
    ) -> Pin<Box<dyn Future<Output = Result<http::Response<WebhookResponseBody>, WebhookError>> + Send>>;
}

/// Dispatch a verified webhook to the handler.
pub async fn dispatch_webhook<H: WebhookHandler>(
    handler: &H,
    request: http::Request<Bytes>,
    request_id: &str,
) -> Result<http::Response<WebhookResponseBody>, WebhookError> {
    tracing::debug!(request_id, path = %request.uri().path(), "dispatching verified webhook");
    handler.handle(request).await
}
