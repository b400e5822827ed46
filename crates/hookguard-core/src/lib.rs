//! Configuration and shared error types for HookGuard.
//!
//! This crate holds the pieces every HookGuard binary needs before a request
//! arrives: environment-driven configuration and the workspace error type.

mod config;
mod error;

pub use config::{HookGuardConfig, LogFormat};
pub use error::{HookGuardError, HookGuardResult};
