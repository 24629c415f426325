//! Engine error types.

use moments_cache::CacheError;
use moments_model::{BindingError, EventError, ModelError};
use moments_properties::PropertyError;
use std::path::PathBuf;
use thiserror::Error;

/// Result type for engine operations.
pub type AppcoreResult<T> = Result<T, AppcoreError>;

#[derive(Debug, Error)]
pub enum AppcoreError {
    #[error("A config URL must be set before start")]
    MissingConfigUrl,

    #[error("Platform bindings must be registered before start")]
    MissingBindings,

    #[error("A cache directory must be set before start")]
    MissingCacheDir,

    #[error("Appcore already started")]
    AlreadyStarted,

    #[error("Appcore not started")]
    NotStarted,

    #[error("Invalid properties: {0}")]
    Property(#[from] PropertyError),

    #[error("Config cache error: {0}")]
    Cache(#[from] CacheError),

    #[error("Unable to read config file {}: {source}", path.display())]
    ReadConfig {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The remote config is malformed or invalid. The message is meant for
    /// whoever maintains it.
    #[error("{0}")]
    Config(#[from] ModelError),

    #[error("Invalid event: {0}")]
    Event(#[from] EventError),

    #[error("No action found with name: {0}")]
    ActionNotFound(String),

    #[error("Action failed: {0}")]
    Binding(#[from] BindingError),

    /// The config loaded, but handing it to the platform failed. The engine
    /// is running with the new config regardless.
    #[error("Post-config setup failed: {0}")]
    PostConfigSetup(String),
}
