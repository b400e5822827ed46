//! Webhook HTTP service implementing the hyper `Service` trait.
//!
//! Request pipeline:
//!
//! 1. Method check (webhooks are `POST` only)
//! 2. Request body collection into a single buffer, capped at
//!    [`WebhookHttpConfig::max_body_size`]
//! 3. Signature verification against that buffer
//! 4. Dispatch of the same buffer to the handler
//!
//! Any signature rejection ends the pipeline with `401 Unauthorized`.

use std::convert::Infallible;
use std::fmt;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use bytes::Bytes;
use http_body_util::{BodyExt, LengthLimitError, Limited};
use tracing::{debug, error, warn};

use hookguard_auth::{RejectReason, SignatureVerifier, VerificationResult, WebhookSecret};

use crate::body::WebhookResponseBody;
use crate::dispatch::{WebhookHandler, dispatch_webhook};
use crate::error::WebhookError;
use crate::response::{error_to_response, unauthorized_response};

/// Default name of the signature header.
pub const DEFAULT_SIGNATURE_HEADER: &str = "paddle-signature";

/// Default cap on the request body size (1 MiB).
pub const DEFAULT_MAX_BODY_SIZE: usize = 1024 * 1024;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Configuration for the webhook HTTP service.
#[derive(Clone)]
pub struct WebhookHttpConfig {
    /// Header carrying the signature.
    pub header_name: http::HeaderName,
    /// Shared secret. With validation enabled and no secret, every request is
    /// rejected.
    pub secret: Option<Arc<WebhookSecret>>,
    /// Verifier holding the freshness window.
    pub verifier: SignatureVerifier,
    /// Whether to skip signature validation (useful for development).
    pub skip_signature_validation: bool,
    /// Largest body accepted, in bytes. Larger requests get `413` before
    /// any verification work.
    pub max_body_size: usize,
}

impl fmt::Debug for WebhookHttpConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WebhookHttpConfig")
            .field("header_name", &self.header_name)
            .field("secret", &self.secret.as_ref().map(|_| "..."))
            .field("verifier", &self.verifier)
            .field("skip_signature_validation", &self.skip_signature_validation)
            .field("max_body_size", &self.max_body_size)
            .finish()
    }
}

impl Default for WebhookHttpConfig {
    fn default() -> Self {
        Self {
            header_name: http::HeaderName::from_static(DEFAULT_SIGNATURE_HEADER),
            secret: None,
            verifier: SignatureVerifier::default(),
            skip_signature_validation: false,
            max_body_size: DEFAULT_MAX_BODY_SIZE,
        }
    }
}

/// Hyper `Service` implementation guarding a [`WebhookHandler`].
#[derive(Debug)]
pub struct WebhookHttpService<H: WebhookHandler> {
    handler: Arc<H>,
    config: Arc<WebhookHttpConfig>,
}

impl<H: WebhookHandler> WebhookHttpService<H> {
    /// Create a new `WebhookHttpService`.
    pub fn new(handler: Arc<H>, config: WebhookHttpConfig) -> Self {
        Self {
            handler,
            config: Arc::new(config),
        }
    }
}

impl<H: WebhookHandler> Clone for WebhookHttpService<H> {
    fn clone(&self) -> Self {
        Self {
            handler: Arc::clone(&self.handler),
            config: Arc::clone(&self.config),
        }
    }
}

impl<H, B> hyper::service::Service<http::Request<B>> for WebhookHttpService<H>
where
    H: WebhookHandler,
    B: http_body::Body<Data = Bytes> + Send + 'static,
    B::Error: Into<BoxError>,
{
    type Response = http::Response<WebhookResponseBody>;
    type Error = Infallible;
    type Future = Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>> + Send>>;

    fn call(&self, req: http::Request<B>) -> Self::Future {
        let handler = Arc::clone(&self.handler);
        let config = Arc::clone(&self.config);
        let request_id = uuid::Uuid::new_v4().to_string();

        Box::pin(async move {
            let response = process_request(req, handler.as_ref(), &config, &request_id).await;
            let response = add_common_headers(response, &request_id);
            Ok(response)
        })
    }
}

/// Process a single webhook request through the full pipeline.
async fn process_request<H, B>(
    req: http::Request<B>,
    handler: &H,
    config: &WebhookHttpConfig,
    request_id: &str,
) -> http::Response<WebhookResponseBody>
where
    H: WebhookHandler,
    B: http_body::Body<Data = Bytes>,
    B::Error: Into<BoxError>,
{
    let (parts, incoming) = req.into_parts();

    // 1. Webhooks are always POSTed.
    if parts.method != http::Method::POST {
        return error_to_response(&WebhookError::method_not_allowed(&parts.method));
    }

    // 2. Collect the body once; the same buffer is hashed and dispatched.
    let body = match collect_body(incoming, config.max_body_size).await {
        Ok(body) => body,
        Err(err) => {
            error!(error = %err, request_id, "failed to collect request body");
            return error_to_response(&err);
        }
    };

    // 3. Authenticate (if enabled).
    if config.skip_signature_validation {
        debug!(request_id, "signature validation skipped");
    } else if let Err(reason) = verify_request(&parts.headers, &body, config, request_id) {
        warn!(request_id, reason, "webhook signature rejected");
        return unauthorized_response();
    }

    // 4. Dispatch to handler.
    let request = http::Request::from_parts(parts, body);
    match dispatch_webhook(handler, request, request_id).await {
        Ok(response) => response,
        Err(err) => {
            warn!(error = %err, request_id, "webhook handler failed");
            error_to_response(&err)
        }
    }
}

/// Run the signature verifier over the request headers and buffered body.
///
/// On rejection, returns the reason code to log.
fn verify_request(
    headers: &http::HeaderMap,
    body: &Bytes,
    config: &WebhookHttpConfig,
    request_id: &str,
) -> Result<(), &'static str> {
    let Some(secret) = config.secret.as_deref() else {
        error!(request_id, "no webhook secret configured, rejecting request");
        return Err("secret_not_configured");
    };

    let header = signature_header(headers, &config.header_name).map_err(RejectReason::code)?;

    debug!(
        request_id,
        header_len = header.map_or(0, str::len),
        "assessing webhook signature"
    );

    match config.verifier.verify_now(header, secret.as_bytes(), body) {
        VerificationResult::Accepted => Ok(()),
        VerificationResult::Rejected(reason) => Err(reason.code()),
    }
}

/// Extract the signature header value. A value that is not visible ASCII is
/// treated as malformed.
fn signature_header<'a>(
    headers: &'a http::HeaderMap,
    name: &http::HeaderName,
) -> Result<Option<&'a str>, RejectReason> {
    headers
        .get(name)
        .map(|value| value.to_str().map_err(|_| RejectReason::MalformedHeader))
        .transpose()
}

/// Collect the incoming body into a single `Bytes` buffer of at most
/// `limit` bytes.
async fn collect_body<B>(incoming: B, limit: usize) -> Result<Bytes, WebhookError>
where
    B: http_body::Body<Data = Bytes>,
    B::Error: Into<BoxError>,
{
    Limited::new(incoming, limit)
        .collect()
        .await
        .map(http_body_util::Collected::to_bytes)
        .map_err(|e| {
            if e.downcast_ref::<LengthLimitError>().is_some() {
                WebhookError::payload_too_large(limit)
            } else {
                WebhookError::invalid_payload(format!("Failed to read request body: {e}"))
            }
        })
}

/// Add common response headers to every webhook response.
fn add_common_headers(
    mut response: http::Response<WebhookResponseBody>,
    request_id: &str,
) -> http::Response<WebhookResponseBody> {
    let headers = response.headers_mut();

    if let Ok(hv) = http::HeaderValue::from_str(request_id) {
        headers.entry("x-request-id").or_insert(hv);
    }

    headers.insert("server", http::HeaderValue::from_static("HookGuard"));

    response
}
