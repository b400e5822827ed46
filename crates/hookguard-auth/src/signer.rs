//! Sender-side signature header construction.
//!
//! Produces the header a sender attaches to a webhook. Useful for tests,
//! local replay tooling, and any service that forwards events onward under
//! the same scheme.

use crate::digest::compute_digest_hex;

/// Build a `ts=<timestamp>;h1=<digest>` header for `body`.
///
/// # Examples
///
/// ```
/// use hookguard_auth::signer::sign_payload;
///
/// let header = sign_payload(b"s3cr3t", 1_700_000_000, b"{}");
/// assert!(header.starts_with("ts=1700000000;h1="));
/// assert_eq!(header.len(), "ts=1700000000;h1=".len() + 64);
/// ```
#[must_use]
pub fn sign_payload(secret: &[u8], timestamp: u64, body: &[u8]) -> String {
    let timestamp_raw = timestamp.to_string();
    let digest = compute_digest_hex(secret, &timestamp_raw, body);
    format!("ts={timestamp_raw};h1={digest}")
}
