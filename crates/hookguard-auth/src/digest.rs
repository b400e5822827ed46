//! Digest computation and comparison.
//!
//! The signed message is the timestamp text exactly as it appeared in the
//! header, a `:` separator, and the raw body bytes:
//!
//! ```text
//! <timestamp_raw>:<body>
//! ```
//!
//! The digest is `HMAC-SHA256(secret, message)`, hex-encoded in lowercase.
//! The body is fed to the MAC as-is; any re-encoding would change the digest.

use hmac::{Hmac, KeyInit, Mac};
use sha2::Sha256;
use subtle::{Choice, ConstantTimeEq};

type HmacSha256 = Hmac<Sha256>;

/// Separator between the timestamp and the body in the signed message.
const MESSAGE_SEPARATOR: &[u8] = b":";

/// Build the canonical signed message.
///
/// The digest functions stream the same three parts into the MAC without
/// allocating this buffer; it is exposed for diagnostics and tests.
///
/// # Examples
///
/// ```
/// use hookguard_auth::digest::canonical_message;
///
/// assert_eq!(
///     canonical_message("1700000000", br#"{"a":1}"#),
///     br#"1700000000:{"a":1}"#.to_vec(),
/// );
/// ```
#[must_use]
pub fn canonical_message(timestamp_raw: &str, body: &[u8]) -> Vec<u8> {
    let mut message =
        Vec::with_capacity(timestamp_raw.len() + MESSAGE_SEPARATOR.len() + body.len());
    message.extend_from_slice(timestamp_raw.as_bytes());
    message.extend_from_slice(MESSAGE_SEPARATOR);
    message.extend_from_slice(body);
    message
}

/// Compute the raw HMAC-SHA256 digest of the canonical message.
#[must_use]
pub fn compute_digest(secret: &[u8], timestamp_raw: &str, body: &[u8]) -> Vec<u8> {
    let mut mac = HmacSha256::new_from_slice(secret).expect("HMAC can accept keys of any length");
    mac.update(timestamp_raw.as_bytes());
    mac.update(MESSAGE_SEPARATOR);
    mac.update(body);
    mac.finalize().into_bytes().to_vec()
}

/// Compute the digest and encode it as lowercase hex (64 characters).
#[must_use]
pub fn compute_digest_hex(secret: &[u8], timestamp_raw: &str, body: &[u8]) -> String {
    hex::encode(compute_digest(secret, timestamp_raw, body))
}

/// Compare two hex digests without leaking where they first differ.
///
/// The loop always walks every byte of `computed_hex`, also when the lengths
/// differ, and the result is the conjunction of a length check and a bytewise
/// check, so `digests_match(a, b) == digests_match(b, a)`.
#[must_use]
pub fn digests_match(computed_hex: &str, supplied_hex: &str) -> bool {
    let computed = computed_hex.as_bytes();
    let supplied = supplied_hex.as_bytes();

    let same_len = computed.len().ct_eq(&supplied.len());
    let mut same_bytes = Choice::from(1);
    for (i, byte) in computed.iter().enumerate() {
        // Past the end of `supplied`, compare against a byte that can never match.
        let other = supplied.get(i).copied().unwrap_or(!*byte);
        same_bytes &= byte.ct_eq(&other);
    }

    (same_len & same_bytes).into()
}
