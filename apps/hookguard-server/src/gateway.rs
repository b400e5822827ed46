//! Gateway service in front of the webhook endpoint.
//!
//! Health-check endpoints (`/health`, `/_health`) are answered at the gateway
//! level without touching signature verification. Every other request goes
//! to the [`WebhookHttpService`].

use std::convert::Infallible;
use std::future::Future;
use std::pin::Pin;

use hyper::body::Incoming;
use hyper::service::Service;

use hookguard_http::{WebhookHandler, WebhookHttpService, WebhookResponseBody};

/// Gateway that answers health probes and forwards webhooks.
#[derive(Debug)]
pub struct GatewayService<H: WebhookHandler> {
    webhook: WebhookHttpService<H>,
}

impl<H: WebhookHandler> GatewayService<H> {
    /// Create a new gateway wrapping the webhook service.
    pub fn new(webhook: WebhookHttpService<H>) -> Self {
        Self { webhook }
    }
}

impl<H: WebhookHandler> Clone for GatewayService<H> {
    fn clone(&self) -> Self {
        Self {
            webhook: self.webhook.clone(),
        }
    }
}

impl<H: WebhookHandler> Service<http::Request<Incoming>> for GatewayService<H> {
    type Response = http::Response<WebhookResponseBody>;
    type Error = Infallible;
    type Future = Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>> + Send>>;

    fn call(&self, req: http::Request<Incoming>) -> Self::Future {
        if is_health_check(req.method(), req.uri().path()) {
            return Box::pin(async { Ok(health_check_response()) });
        }

        let webhook = self.webhook.clone();
        Box::pin(async move { webhook.call(req).await })
    }
}

/// Check if the request is a health check probe.
fn is_health_check(method: &http::Method, path: &str) -> bool {
    *method == http::Method::GET && (path == "/health" || path == "/_health")
}

/// Produce the health check response.
fn health_check_response() -> http::Response<WebhookResponseBody> {
    http::Response::builder()
        .status(http::StatusCode::OK)
        .header("Content-Type", "application/json")
        .body(WebhookResponseBody::from_string(r#"{"status":"running"}"#))
        .expect("static health response should be valid")
}
