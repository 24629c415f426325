//! Local cache for the remote Moments configuration.
//!
//! Turns a config URL into a trustworthy local file:
//! - `file://` URLs resolve to their path with no I/O
//! - `https://` URLs are fetched once per label, revalidated with ETags, and
//!   persisted atomically with a content hash
//! - A failed fetch falls back to the last valid copy when there is one
//!
//! Anything other than `file://` or `https://` is rejected by
//! [`ConfigUrl::parse`] before any file or network access.

mod cache;
mod config;
mod error;
mod fetcher;
mod url;

pub use cache::{CacheMeta, ConfigCache, PRIMARY_CONFIG_LABEL};
pub use config::CacheConfig;
pub use error::{CacheError, CacheResult};
pub use fetcher::{ConfigFetcher, FetchOutcome, HttpFetcher};
pub use url::ConfigUrl;
