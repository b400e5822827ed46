//! Signature header parsing.
//!
//! The header is a list of semicolon-separated `key=value` fields:
//!
//! ```text
//! ts=1671552777;h1=eb4d0dc8853be92b7f063b9f3ba5233eb920a09459b6e6b2c26705b4364db151
//! ```
//!
//! Only the positions are significant: the first field carries the timestamp
//! and the last field carries the digest. Senders may append fields in between
//! (for example when rotating to another digest algorithm), so intermediate
//! fields are kept aside instead of being rejected.

use crate::error::RejectReason;

/// Separator between header fields.
const FIELD_SEPARATOR: char = ';';

/// Separator between a field's key and value.
const KEY_VALUE_SEPARATOR: char = '=';

/// Parsed components of a signature header.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignatureHeader {
    /// The timestamp digits exactly as received. This is what gets signed.
    pub timestamp_raw: String,
    /// The timestamp in Unix seconds.
    pub timestamp: i64,
    /// The supplied hex-encoded digest.
    pub digest_hex: String,
    /// Fields between the timestamp and the digest. Not interpreted.
    pub extra_fields: Vec<String>,
}

impl SignatureHeader {
    /// Parse a signature header value.
    ///
    /// # Errors
    ///
    /// - [`RejectReason::MissingHeader`] if the value is empty.
    /// - [`RejectReason::MalformedHeader`] if there are fewer than two fields,
    ///   the first or last field has no `=`, or either value is empty.
    /// - [`RejectReason::InvalidTimestamp`] if the timestamp is not a
    ///   non-negative integer that fits in an `i64`.
    ///
    /// # Examples
    ///
    /// ```
    /// use hookguard_auth::header::SignatureHeader;
    ///
    /// let header = SignatureHeader::parse("ts=1671552777;h1=abc123").unwrap();
    /// assert_eq!(header.timestamp, 1_671_552_777);
    /// assert_eq!(header.digest_hex, "abc123");
    /// ```
    pub fn parse(header: &str) -> Result<Self, RejectReason> {
        if header.is_empty() {
            return Err(RejectReason::MissingHeader);
        }

        let fields: Vec<&str> = header.split(FIELD_SEPARATOR).collect();
        let [first, middle @ .., last] = fields.as_slice() else {
            return Err(RejectReason::MalformedHeader);
        };

        let timestamp_raw = field_value(first)?;
        let digest_hex = field_value(last)?;
        let timestamp = parse_timestamp(timestamp_raw)?;

        Ok(Self {
            timestamp_raw: timestamp_raw.to_owned(),
            timestamp,
            digest_hex: digest_hex.to_owned(),
            extra_fields: middle.iter().map(|f| (*f).to_owned()).collect(),
        })
    }

    /// Whether the header carried fields beyond the documented `ts` and `h1`.
    #[must_use]
    pub fn has_extra_fields(&self) -> bool {
        !self.extra_fields.is_empty()
    }
}

/// Extract the non-empty value after the first `=` of a field.
fn field_value(field: &str) -> Result<&str, RejectReason> {
    let (_, value) = field
        .split_once(KEY_VALUE_SEPARATOR)
        .ok_or(RejectReason::MalformedHeader)?;
    if value.is_empty() {
        return Err(RejectReason::MalformedHeader);
    }
    Ok(value)
}

/// Parse the timestamp digits. Signs and whitespace are rejected because the
/// raw text is part of the signed message.
fn parse_timestamp(raw: &str) -> Result<i64, RejectReason> {
    if !raw.bytes().all(|b| b.is_ascii_digit()) {
        return Err(RejectReason::InvalidTimestamp);
    }
    raw.parse::<i64>()
        .map_err(|_| RejectReason::InvalidTimestamp)
}
