//! Error types for session management

use clef_effects::EffectError;
use thiserror::Error;

/// Errors surfaced by the effect manager
#[derive(Error, Debug)]
pub enum ManagerError {
    /// The manager has been shut down and accepts no further sessions
    #[error("Effect manager is shut down")]
    ShutDown,

    /// An effect backend operation failed
    #[error(transparent)]
    Effect(#[from] EffectError),
}

/// Result type for manager operations
pub type Result<T> = std::result::Result<T, ManagerError>;
