//! Webhook HTTP error types.

use std::fmt;

/// Error codes produced by the webhook HTTP layer and its handlers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[non_exhaustive]
pub enum WebhookErrorCode {
    /// Webhooks are delivered with `POST` only.
    MethodNotAllowed,
    /// The request body could not be read or understood.
    InvalidPayload,
    /// The request body exceeds the configured limit.
    PayloadTooLarge,
    /// The handler failed.
    InternalError,
}

impl WebhookErrorCode {
    /// Returns the short error code string.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::MethodNotAllowed => "MethodNotAllowed",
            Self::InvalidPayload => "InvalidPayload",
            Self::PayloadTooLarge => "PayloadTooLarge",
            Self::InternalError => "InternalError",
        }
    }

    /// Returns the default HTTP status code for this error.
    #[must_use]
    pub fn default_status_code(&self) -> http::StatusCode {
        match self {
            Self::MethodNotAllowed => http::StatusCode::METHOD_NOT_ALLOWED,
            Self::InvalidPayload => http::StatusCode::BAD_REQUEST,
            Self::PayloadTooLarge => http::StatusCode::PAYLOAD_TOO_LARGE,
            Self::InternalError => http::StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl fmt::Display for WebhookErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A webhook error response.
#[derive(Debug)]
pub struct WebhookError {
    /// The error code.
    pub code: WebhookErrorCode,
    /// A human-readable error message.
    pub message: String,
    /// The HTTP status code.
    pub status_code: http::StatusCode,
}

impl fmt::Display for WebhookError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "WebhookError({}): {}", self.code, self.message)
    }
}

impl std::error::Error for WebhookError {}

impl WebhookError {
    /// Create a new `WebhookError` with a custom message.
    #[must_use]
    pub fn with_message(code: WebhookErrorCode, message: impl Into<String>) -> Self {
        Self {
            status_code: code.default_status_code(),
            message: message.into(),
            code,
        }
    }

    /// Wrong HTTP method.
    #[must_use]
    pub fn method_not_allowed(method: &http::Method) -> Self {
        Self::with_message(
            WebhookErrorCode::MethodNotAllowed,
            format!("Webhooks must be delivered with POST, got {method}"),
        )
    }

    /// Unreadable or unparseable body.
    #[must_use]
    pub fn invalid_payload(message: impl Into<String>) -> Self {
        Self::with_message(WebhookErrorCode::InvalidPayload, message)
    }

    /// Body larger than `limit` bytes.
    #[must_use]
    pub fn payload_too_large(limit: usize) -> Self {
        Self::with_message(
            WebhookErrorCode::PayloadTooLarge,
            format!("Request body exceeds {limit} bytes"),
        )
    }

    /// Handler failure.
    #[must_use]
    pub fn internal_error(message: impl Into<String>) -> Self {
        Self::with_message(WebhookErrorCode::InternalError, message)
    }
}
