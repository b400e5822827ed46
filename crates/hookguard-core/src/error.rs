//! Error types for the HookGuard core.

/// Core error type for HookGuard infrastructure.
#[derive(Debug, thiserror::Error)]
pub enum HookGuardError {
    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),
}

/// Convenience result type for HookGuard operations.
pub type HookGuardResult<T> = Result<T, HookGuardError>;
