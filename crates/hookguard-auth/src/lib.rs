//! Webhook signature verification for HookGuard.
//!
//! This crate verifies that an inbound webhook was signed by a sender holding
//! the shared secret, and that it is fresh enough not to be a replay. It is
//! transport-agnostic: callers pass the raw signature header value, the exact
//! body bytes received on the wire, the secret, and the current time.
//!
//! # Overview
//!
//! The signature header looks like this:
//!
//! ```text
//! ts=1671552777;h1=eb4d0dc8853be92b7f063b9f3ba5233eb920a09459b6e6b2c26705b4364db151
//! ```
//!
//! The `h1` digest is `HMAC-SHA256(secret, "<ts>:<body>")`, hex-encoded.
//! Verification parses the header, rejects events outside the freshness
//! window, recomputes the digest and compares it in constant time.
//!
//! # Usage
//!
//! ```rust
//! use chrono::DateTime;
//! use hookguard_auth::{SignatureVerifier, VerificationResult, sign_payload};
//!
//! let now = DateTime::from_timestamp(1_700_000_000, 0).unwrap();
//! let header = sign_payload(b"s3cr3t", 1_700_000_000, br#"{"a":1}"#);
//!
//! let verifier = SignatureVerifier::default();
//! let result = verifier.verify(Some(&header), b"s3cr3t", br#"{"a":1}"#, now);
//! assert_eq!(result, VerificationResult::Accepted);
//! ```
//!
//! # Modules
//!
//! - [`digest`] - Canonical message construction, HMAC computation, constant-time comparison
//! - [`error`] - Rejection reasons
//! - [`freshness`] - Timestamp window validation
//! - [`header`] - Signature header parsing
//! - [`secret`] - Redacted shared secret container
//! - [`signer`] - Sender-side header construction
//! - [`verifier`] - The verification pipeline

pub mod digest;
pub mod error;
pub mod freshness;
pub mod header;
pub mod secret;
pub mod signer;
pub mod verifier;

pub use digest::{compute_digest, compute_digest_hex, digests_match};
pub use error::RejectReason;
pub use freshness::{DEFAULT_TOLERANCE, check_freshness};
pub use header::SignatureHeader;
pub use secret::WebhookSecret;
pub use signer::sign_payload;
pub use verifier::{SignatureVerifier, VerificationResult};
