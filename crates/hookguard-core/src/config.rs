//! Configuration management for HookGuard.
//!
//! All configuration is driven by environment variables.

use std::fmt;

use crate::error::{HookGuardError, HookGuardResult};

/// Output format of the log lines.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// Human-readable lines.
    #[default]
    Full,
    /// One JSON object per line.
    Json,
}

impl std::str::FromStr for LogFormat {
    type Err = HookGuardError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "full" | "text" => Ok(Self::Full),
            "json" => Ok(Self::Json),
            other => Err(HookGuardError::Config(format!(
                "LOG_FORMAT must be \"full\" or \"json\", got {other:?}"
            ))),
        }
    }
}

/// Global configuration for HookGuard.
#[derive(Clone, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HookGuardConfig {
    /// Bind address for the gateway.
    pub gateway_listen: String,
    /// Log level.
    pub log_level: String,
    /// Log line format.
    pub log_format: LogFormat,
    /// Name of the header carrying the signature.
    pub signature_header: String,
    /// Freshness window in seconds.
    pub signature_tolerance_secs: u64,
    /// Skip signature validation entirely (development only).
    pub skip_signature_validation: bool,
    /// Largest accepted request body in bytes.
    pub max_body_size: usize,
    /// Shared secret used to verify signatures.
    #[serde(skip)]
    pub webhook_secret: Option<String>,
}

impl fmt::Debug for HookGuardConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HookGuardConfig")
            .field("gateway_listen", &self.gateway_listen)
            .field("log_level", &self.log_level)
            .field("log_format", &self.log_format)
            .field("signature_header", &self.signature_header)
            .field("signature_tolerance_secs", &self.signature_tolerance_secs)
            .field("skip_signature_validation", &self.skip_signature_validation)
            .field("max_body_size", &self.max_body_size)
            .field("webhook_secret", &self.webhook_secret.as_ref().map(|_| "..."))
            .finish()
    }
}

impl Default for HookGuardConfig {
    fn default() -> Self {
        Self {
            gateway_listen: "0.0.0.0:8080".to_owned(),
            log_level: "info".to_owned(),
            log_format: LogFormat::Full,
            signature_header: "Paddle-Signature".to_owned(),
            signature_tolerance_secs: 300,
            skip_signature_validation: false,
            max_body_size: 1024 * 1024,
            webhook_secret: None,
        }
    }
}

impl HookGuardConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> HookGuardResult<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration from an arbitrary key lookup.
    ///
    /// # Errors
    ///
    /// Returns [`HookGuardError::Config`] if a value cannot be parsed, or if
    /// no secret is configured while signature validation is enabled.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> HookGuardResult<Self> {
        let mut config = Self::default();

        if let Some(v) = lookup("GATEWAY_LISTEN") {
            config.gateway_listen = v;
        }
        if let Some(v) = lookup("LOG_LEVEL") {
            config.log_level = v;
        }
        if let Some(v) = lookup("LOG_FORMAT") {
            config.log_format = v.parse()?;
        }
        if let Some(v) = lookup("SIGNATURE_HEADER") {
            let v = v.trim();
            if v.is_empty() {
                return Err(HookGuardError::Config(
                    "SIGNATURE_HEADER must not be empty".to_owned(),
                ));
            }
            config.signature_header = v.to_owned();
        }
        if let Some(v) = lookup("SIGNATURE_TOLERANCE_SECS") {
            config.signature_tolerance_secs = v.trim().parse().map_err(|_| {
                HookGuardError::Config(format!(
                    "SIGNATURE_TOLERANCE_SECS must be a non-negative integer, got {v:?}"
                ))
            })?;
        }
        if let Some(v) = lookup("MAX_BODY_SIZE") {
            config.max_body_size = match v.trim().parse() {
                Ok(n) if n > 0 => n,
                _ => {
                    return Err(HookGuardError::Config(format!(
                        "MAX_BODY_SIZE must be a positive integer, got {v:?}"
                    )));
                }
            };
        }
        if let Some(v) = lookup("SKIP_SIGNATURE_VALIDATION") {
            config.skip_signature_validation = parse_bool("SKIP_SIGNATURE_VALIDATION", &v)?;
        }
        config.webhook_secret = lookup("WEBHOOK_SECRET").filter(|v| !v.is_empty());

        if !config.skip_signature_validation && config.webhook_secret.is_none() {
            return Err(HookGuardError::Config(
                "WEBHOOK_SECRET is required unless SKIP_SIGNATURE_VALIDATION is set".to_owned(),
            ));
        }

        Ok(config)
    }
}

fn parse_bool(key: &str, value: &str) -> HookGuardResult<bool> {
    match value.trim() {
        "1" => Ok(true),
        "0" => Ok(false),
        v if v.eq_ignore_ascii_case("true") => Ok(true),
        v if v.eq_ignore_ascii_case("false") => Ok(false),
        v => Err(HookGuardError::Config(format!(
            "{key} must be a boolean, got {v:?}"
        ))),
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| ((*k).to_owned(), (*v).to_owned()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_should_create_default_config() {
        let config = HookGuardConfig::default();
        assert_eq!(config.gateway_listen, "0.0.0.0:8080");
        assert_eq!(config.signature_header, "Paddle-Signature");
        assert_eq!(config.signature_tolerance_secs, 300);
        assert!(!config.skip_signature_validation);
        assert_eq!(config.max_body_size, 1024 * 1024);
        assert!(config.webhook_secret.is_none());
    }

    #[test]
    fn test_should_load_all_values() {
        let config = HookGuardConfig::from_lookup(lookup_from(&[
            ("GATEWAY_LISTEN", "127.0.0.1:9000"),
            ("LOG_LEVEL", "debug"),
            ("LOG_FORMAT", "json"),
            ("SIGNATURE_HEADER", "X-Signature"),
            ("SIGNATURE_TOLERANCE_SECS", "60"),
            ("MAX_BODY_SIZE", "4096"),
            ("WEBHOOK_SECRET", "pdl_ntfset_abc"),
        ]))
        .unwrap();

        assert_eq!(config.gateway_listen, "127.0.0.1:9000");
        assert_eq!(config.log_level, "debug");
        assert_eq!(config.log_format, LogFormat::Json);
        assert_eq!(config.signature_header, "X-Signature");
        assert_eq!(config.signature_tolerance_secs, 60);
        assert_eq!(config.max_body_size, 4096);
        assert_eq!(config.webhook_secret.as_deref(), Some("pdl_ntfset_abc"));
    }

    #[test]
    fn test_should_require_secret_when_validating() {
        let result = HookGuardConfig::from_lookup(lookup_from(&[]));
        assert!(matches!(result, Err(HookGuardError::Config(_))));

        let result = HookGuardConfig::from_lookup(lookup_from(&[("WEBHOOK_SECRET", "")]));
        assert!(matches!(result, Err(HookGuardError::Config(_))));
    }

    #[test]
    fn test_should_allow_missing_secret_when_skipping() {
        let config =
            HookGuardConfig::from_lookup(lookup_from(&[("SKIP_SIGNATURE_VALIDATION", "true")]))
                .unwrap();
        assert!(config.skip_signature_validation);
        assert!(config.webhook_secret.is_none());
    }

    #[test]
    fn test_should_reject_invalid_tolerance() {
        let result = HookGuardConfig::from_lookup(lookup_from(&[
            ("WEBHOOK_SECRET", "s"),
            ("SIGNATURE_TOLERANCE_SECS", "-5"),
        ]));
        assert!(matches!(result, Err(HookGuardError::Config(_))));
    }

    #[test]
    fn test_should_reject_invalid_max_body_size() {
        for value in ["0", "-1", "lots"] {
            let result = HookGuardConfig::from_lookup(lookup_from(&[
                ("WEBHOOK_SECRET", "s"),
                ("MAX_BODY_SIZE", value),
            ]));
            assert!(matches!(result, Err(HookGuardError::Config(_))), "{value}");
        }
    }

    #[test]
    fn test_should_parse_log_format() {
        assert_eq!("JSON".parse::<LogFormat>().unwrap(), LogFormat::Json);
        assert_eq!("text".parse::<LogFormat>().unwrap(), LogFormat::Full);
        assert!(matches!(
            "yaml".parse::<LogFormat>(),
            Err(HookGuardError::Config(_))
        ));
    }

    #[test]
    fn test_should_reject_invalid_bool() {
        let result = HookGuardConfig::from_lookup(lookup_from(&[
            ("WEBHOOK_SECRET", "s"),
            ("SKIP_SIGNATURE_VALIDATION", "maybe"),
        ]));
        assert!(matches!(result, Err(HookGuardError::Config(_))));
    }

    #[test]
    fn test_should_reject_blank_header_name() {
        let result = HookGuardConfig::from_lookup(lookup_from(&[
            ("WEBHOOK_SECRET", "s"),
            ("SIGNATURE_HEADER", "  "),
        ]));
        assert!(matches!(result, Err(HookGuardError::Config(_))));
    }

    #[test]
    fn test_should_never_expose_secret() {
        let config =
            HookGuardConfig::from_lookup(lookup_from(&[("WEBHOOK_SECRET", "supersecret")]))
                .unwrap();

        assert!(!format!("{config:?}").contains("supersecret"));
        let json = serde_json::to_string(&config).unwrap();
        assert!(!json.contains("supersecret"));
        assert!(json.contains("\"signatureHeader\":\"Paddle-Signature\""));
    }
}
