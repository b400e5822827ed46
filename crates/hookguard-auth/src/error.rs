//! Rejection reasons for webhook signature verification.
//!
//! Every failure of the verification pipeline is one of the [`RejectReason`]
//! variants. None of them carry request data, so a reason can be logged or
//! returned to a caller without leaking secret-derived material.

/// Why a webhook request was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, thiserror::Error)]
pub enum RejectReason {
    /// The signature header is absent or empty.
    #[error("Missing signature header")]
    MissingHeader,

    /// The signature header does not split into usable `key=value` fields.
    #[error("Malformed signature header")]
    MalformedHeader,

    /// The timestamp field is not a valid non-negative integer.
    #[error("Invalid signature timestamp")]
    InvalidTimestamp,

    /// The event timestamp is later than the current time.
    #[error("Signature timestamp is in the future")]
    TimestampInFuture,

    /// The event timestamp is older than the freshness window.
    #[error("Signature timestamp is too old")]
    TimestampTooOld,

    /// The computed digest does not equal the supplied digest.
    #[error("Signature does not match")]
    DigestMismatch,
}

impl RejectReason {
    /// Stable machine-readable code, suitable for structured log fields.
    #[must_use]
    pub fn code(self) -> &'static str {
        match self {
            Self::MissingHeader => "missing_header",
            Self::MalformedHeader => "malformed_header",
            Self::InvalidTimestamp => "invalid_timestamp",
            Self::TimestampInFuture => "timestamp_in_future",
            Self::TimestampTooOld => "timestamp_too_old",
            Self::DigestMismatch => "digest_mismatch",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_should_expose_distinct_codes() {
        let all = [
            RejectReason::MissingHeader,
            RejectReason::MalformedHeader,
            RejectReason::InvalidTimestamp,
            RejectReason::TimestampInFuture,
            RejectReason::TimestampTooOld,
            RejectReason::DigestMismatch,
        ];
        let mut codes: Vec<&str> = all.iter().map(|r| r.code()).collect();
        codes.sort_unstable();
        codes.dedup();
        assert_eq!(codes.len(), all.len());
    }

    #[test]
    fn test_should_display_human_readable_message() {
        assert_eq!(
            RejectReason::DigestMismatch.to_string(),
            "Signature does not match"
        );
    }
}
