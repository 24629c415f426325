//! Config cache error types.

use thiserror::Error;

/// Result type for cache operations.
pub type CacheResult<T> = Result<T, CacheError>;

#[derive(Debug, Error)]
pub enum CacheError {
    /// Rejected before any file or network access.
    #[error("Config URL must start with file:// or https://, got \"{0}\"")]
    UnsupportedScheme(String),

    #[error("Config URL \"{0}\" has no path or host")]
    EmptyUrl(String),

    #[error("invalid cache label \"{0}\": use letters, digits, '-' or '_'")]
    InvalidLabel(String),

    #[error("cache I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("cache metadata error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("HTTP {status} fetching {url}")]
    HttpStatus { status: u16, url: String },

    #[error("fetching {url} failed after {attempts} attempts: {last_error}")]
    RetriesExhausted {
        url: String,
        attempts: u32,
        last_error: String,
    },

    /// A fetched body that is not JSON never replaces the cached copy.
    #[error("config fetched from {url} is not valid JSON: {source}")]
    InvalidBody {
        url: String,
        #[source]
        source: serde_json::Error,
    },

    /// The server answered 304 to a request that carried no cached copy.
    #[error("server reported {0} unchanged but no valid cached copy exists")]
    NotModifiedWithoutCache(String),
}

impl CacheError {
    /// Whether another attempt could plausibly succeed.
    pub fn is_transient(&self) -> bool {
        match self {
            CacheError::Http(e) => !e.is_builder() && !e.is_redirect(),
            CacheError::HttpStatus { status, .. } => *status >= 500,
            _ => false,
        }
    }
}
