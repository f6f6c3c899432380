use crate::engine::EffectKind;
use clef_core::SessionId;
use thiserror::Error;

/// Result type for effect operations
pub type Result<T> = std::result::Result<T, EffectError>;

/// Errors raised by effect backends and chains
#[derive(Debug, Error)]
pub enum EffectError {
    /// A native effect instance could not be constructed
    #[error("Effect creation failed: {0}")]
    CreationFailed(String),

    /// The backend rejected a parameter write
    #[error("Parameter apply failed: {0}")]
    ApplyFailed(String),

    /// The handle does not implement this operation
    #[error("Operation not supported: {0}")]
    Unsupported(&'static str),

    /// The chain was already released
    #[error("Effect chain already released")]
    Released,
}

impl EffectError {
    /// Create a creation error with effect and session context
    pub fn creation(kind: EffectKind, session: SessionId, reason: impl Into<String>) -> Self {
        Self::CreationFailed(format!("{kind} for session {session}: {}", reason.into()))
    }

    /// Create an apply error with effect and field context
    pub fn apply(kind: EffectKind, field: &str, reason: impl Into<String>) -> Self {
        Self::ApplyFailed(format!("{kind} {field}: {}", reason.into()))
    }
}
