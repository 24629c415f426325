//! Error types for the data model.

use thiserror::Error;

/// Result type for model parsing and validation.
pub type ModelResult<T> = Result<T, ModelError>;

/// A configuration error suitable for showing to whoever edits the remote
/// config.
///
/// `Display` is always a readable sentence. For wire-shape failures the
/// underlying serde error is kept as the `source` for logs, never as the
/// message.
#[derive(Debug, Error)]
pub enum ModelError {
    /// The document parsed but breaks a semantic rule.
    #[error("{0}")]
    Invalid(String),

    /// The document does not match the expected JSON shape.
    #[error("{message}")]
    Malformed {
        message: String,
        #[source]
        source: serde_json::Error,
    },
}

impl ModelError {
    pub fn invalid(message: impl Into<String>) -> Self {
        Self::Invalid(message.into())
    }

    pub fn malformed(message: impl Into<String>, source: serde_json::Error) -> Self {
        Self::Malformed {
            message: message.into(),
            source,
        }
    }

    /// The operator-facing message.
    #[must_use]
    pub fn user_message(&self) -> &str {
        match self {
            Self::Invalid(message) | Self::Malformed { message, .. } => message,
        }
    }

    /// Prefixes the message with where in the document the problem is.
    #[must_use]
    pub fn context(self, context: impl std::fmt::Display) -> Self {
        match self {
            Self::Invalid(message) => Self::Invalid(format!("{context}: {message}")),
            Self::Malformed { message, source } => Self::Malformed {
                message: format!("{context}: {message}"),
                source,
            },
        }
    }
}

/// Result type for event construction.
pub type EventResult<T> = Result<T, EventError>;

/// Errors raised when an event name does not belong to the claimed class.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EventError {
    #[error("event name must not be empty")]
    EmptyName,

    #[error("\"{0}\" is not a built-in event")]
    NotBuiltIn(String),

    #[error("\"{0}\" is not a well-known event")]
    NotWellKnown(String),

    /// A custom event reused a built-in or well-known name.
    #[error("\"{0}\" is a reserved event name and can not be sent as a custom event")]
    ReservedName(String),

    /// A custom event falls inside a namespace owned by the SDK.
    #[error("\"{0}\" is inside a reserved event namespace")]
    ReservedNamespace(String),
}
