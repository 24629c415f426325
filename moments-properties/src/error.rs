//! Error types for the property registry.

use crate::PropertyKind;
use thiserror::Error;

/// Result type for property operations.
pub type PropertyResult<T> = Result<T, PropertyError>;

/// Errors raised by property registration and schema validation.
///
/// The `Display` output is the human-readable message surfaced to the host
/// developer when `Start` is refused.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PropertyError {
    /// A version property was registered without a key prefix.
    #[error("Prefix required for version property")]
    MissingPrefix,

    /// A version string had a non-numeric component.
    #[error("Invalid version number format: \"{0}\"")]
    InvalidVersion(String),

    /// A required property was never registered.
    #[error("Missing required property: {0}")]
    MissingRequired(String),

    /// A required or well-known property was registered with the wrong kind.
    #[error("Property \"{key}\" of wrong kind. Expected {expected}")]
    WrongKind { key: String, expected: PropertyKind },
}
