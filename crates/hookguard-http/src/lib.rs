//! Webhook HTTP service layer for HookGuard.
//!
//! This crate puts the signature verifier in front of a webhook endpoint:
//!
//! - **Service**: Hyper `Service` that buffers the body once, verifies the
//!   signature header, and answers `401 Unauthorized` on any rejection
//! - **Handler trait**: Defines the boundary between the HTTP transport and
//!   whatever processes accepted events
//! - **Response helpers**: JSON error and success formatting
#![allow(missing_docs)]

pub mod body;
pub mod dispatch;
pub mod error;
pub mod response;
pub mod service;

pub use body::WebhookResponseBody;
pub use dispatch::WebhookHandler;
pub use error::{WebhookError, WebhookErrorCode};
pub use service::{WebhookHttpConfig, WebhookHttpService};
