//! Shared webhook secret.
//!
//! [`WebhookSecret`] owns the key bytes and never prints them: its `Debug`
//! output is redacted and it implements neither `Display` nor `Serialize`.

use std::fmt;

/// The secret shared with the webhook sender.
#[derive(Clone, PartialEq, Eq)]
pub struct WebhookSecret(Vec<u8>);

impl WebhookSecret {
    /// Create a secret from raw key bytes.
    pub fn new(bytes: impl Into<Vec<u8>>) -> Self {
        Self(bytes.into())
    }

    /// The key bytes, for feeding to the MAC.
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }
}

impl fmt::Debug for WebhookSecret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("WebhookSecret(..)")
    }
}

impl From<String> for WebhookSecret {
    fn from(value: String) -> Self {
        Self(value.into_bytes())
    }
}

impl From<&str> for WebhookSecret {
    fn from(value: &str) -> Self {
        Self(value.as_bytes().to_vec())
    }
}

impl AsRef<[u8]> for WebhookSecret {
    fn as_ref(&self) -> &[u8] {
        self.as_bytes()
    }
}
