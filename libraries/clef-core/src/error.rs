//! Error types for configuration loading

use thiserror::Error;

/// Result type alias using `ConfigError`
pub type Result<T> = std::result::Result<T, ConfigError>;

/// Errors raised while loading stored configuration bundles
///
/// Lookup itself never fails; only reading a bundle from JSON or disk can.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// I/O errors
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// Malformed configuration bundle
    #[error(transparent)]
    Parse(#[from] serde_json::Error),
}
