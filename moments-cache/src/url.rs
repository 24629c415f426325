use crate::error::{CacheError, CacheResult};
use std::fmt;
use std::path::PathBuf;

const FILE_SCHEME: &str = "file://";
const HTTPS_SCHEME: &str = "https://";

/// A config location that passed scheme validation.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ConfigUrl {
    /// A local file. The path is taken verbatim; existence is checked on read.
    File(PathBuf),
    /// A remote document, fetched through the cache.
    Https(String),
}

impl ConfigUrl {
    /// Validates the scheme. No file or network access happens here.
    pub fn parse(url: &str) -> CacheResult<Self> {
        if let Some(path) = url.strip_prefix(FILE_SCHEME) {
            if path.is_empty() {
                return Err(CacheError::EmptyUrl(url.to_string()));
            }
            return Ok(Self::File(PathBuf::from(path)));
        }
        if let Some(rest) = url.strip_prefix(HTTPS_SCHEME) {
            if rest.is_empty() || rest.starts_with('/') {
                return Err(CacheError::EmptyUrl(url.to_string()));
            }
            return Ok(Self::Https(url.to_string()));
        }
        Err(CacheError::UnsupportedScheme(url.to_string()))
    }

    #[must_use]
    pub fn is_remote(&self) -> bool {
        matches!(self, Self::Https(_))
    }
}

impl fmt::Display for ConfigUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::File(path) => write!(f, "{FILE_SCHEME}{}", path.display()),
            Self::Https(url) => f.write_str(url),
        }
    }
}
