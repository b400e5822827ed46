//! Webhook signature verification.
//!
//! This module implements the verification flow:
//!
//! 1. Parse the signature header into its timestamp and digest.
//! 2. Reject events outside the freshness window.
//! 3. Recompute the digest over `<timestamp_raw>:<body>` with the shared secret.
//! 4. Compare it to the supplied digest in constant time.
//!
//! Every failure becomes [`VerificationResult::Rejected`]; nothing panics or
//! propagates. The main entry point is [`SignatureVerifier::verify`].

use chrono::{DateTime, TimeDelta, Utc};
use tracing::{debug, warn};

use crate::digest::{compute_digest_hex, digests_match};
use crate::error::RejectReason;
use crate::freshness::{DEFAULT_TOLERANCE, check_freshness};
use crate::header::SignatureHeader;

/// The outcome of verifying one webhook request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VerificationResult {
    /// The request is authentic and fresh.
    Accepted,
    /// The request must be refused.
    Rejected(RejectReason),
}

impl VerificationResult {
    /// Whether the request was accepted.
    #[must_use]
    pub fn is_accepted(self) -> bool {
        matches!(self, Self::Accepted)
    }

    /// The rejection reason, if any.
    #[must_use]
    pub fn reason(self) -> Option<RejectReason> {
        match self {
            Self::Accepted => None,
            Self::Rejected(reason) => Some(reason),
        }
    }

    /// Convert into a `Result` for `?`-style callers.
    pub fn into_result(self) -> Result<(), RejectReason> {
        match self {
            Self::Accepted => Ok(()),
            Self::Rejected(reason) => Err(reason),
        }
    }
}

impl From<Result<(), RejectReason>> for VerificationResult {
    fn from(result: Result<(), RejectReason>) -> Self {
        match result {
            Ok(()) => Self::Accepted,
            Err(reason) => Self::Rejected(reason),
        }
    }
}

/// Verifies webhook signatures against a freshness window.
///
/// Holds no secret and no mutable state; share one instance across requests.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SignatureVerifier {
    tolerance: TimeDelta,
}

impl Default for SignatureVerifier {
    fn default() -> Self {
        Self {
            tolerance: DEFAULT_TOLERANCE,
        }
    }
}

impl SignatureVerifier {
    /// Create a verifier with the default 5 minute window.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Override the freshness window.
    #[must_use]
    pub fn with_tolerance(mut self, tolerance: TimeDelta) -> Self {
        self.tolerance = tolerance;
        self
    }

    /// The configured freshness window.
    #[must_use]
    pub fn tolerance(&self) -> TimeDelta {
        self.tolerance
    }

    /// Verify a webhook request.
    ///
    /// `header` is the signature header value, or `None` when the request
    /// carried no such header. `body` must be the exact bytes received.
    #[must_use]
    pub fn verify(
        &self,
        header: Option<&str>,
        secret: &[u8],
        body: &[u8],
        now: DateTime<Utc>,
    ) -> VerificationResult {
        self.try_verify(header, secret, body, now).into()
    }

    /// Verify against the current wall-clock time.
    #[must_use]
    pub fn verify_now(&self, header: Option<&str>, secret: &[u8], body: &[u8]) -> VerificationResult {
        self.verify(header, secret, body, Utc::now())
    }

    fn try_verify(
        &self,
        header: Option<&str>,
        secret: &[u8],
        body: &[u8],
        now: DateTime<Utc>,
    ) -> Result<(), RejectReason> {
        let header = header.ok_or(RejectReason::MissingHeader)?;
        let parsed = SignatureHeader::parse(header)?;

        if parsed.has_extra_fields() {
            warn!(
                extra_fields = parsed.extra_fields.len(),
                "Signature header carries unsupported fields, using the last field as digest"
            );
        }

        debug!(
            timestamp = parsed.timestamp,
            body_len = body.len(),
            "Checking signature freshness"
        );

        check_freshness(parsed.timestamp, now, self.tolerance)?;

        let expected = compute_digest_hex(secret, &parsed.timestamp_raw, body);

        if digests_match(&expected, &parsed.digest_hex) {
            debug!(timestamp = parsed.timestamp, "Signature verification succeeded");
            Ok(())
        } else {
            debug!(
                supplied_len = parsed.digest_hex.len(),
                "Signature mismatch"
            );
            Err(RejectReason::DigestMismatch)
        }
    }
}
