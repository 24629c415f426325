//! On-disk config cache.
//!
//! Each label gets its own directory under the cache root:
//!
//! ```text
//! {root}/{label}/config.json   raw document bytes
//! {root}/{label}/meta.json     url, sha256, etag, fetchedAt
//! ```
//!
//! Both files are written to a temp file in the same directory and renamed
//! into place, body first. A copy is only trusted when its meta parses, names
//! the requested URL, and carries the body's SHA-256, so a crash between the
//! two renames leaves an entry that is simply refetched.

use crate::config::CacheConfig;
use crate::error::{CacheError, CacheResult};
use crate::fetcher::{ConfigFetcher, FetchOutcome, HttpFetcher};
use crate::url::ConfigUrl;
use chrono::{DateTime, Utc};
use serde::de::IgnoredAny;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::collections::HashMap;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, PoisonError};
use tracing::{debug, info, warn};

/// Label of the root configuration document.
pub const PRIMARY_CONFIG_LABEL: &str = "primary";

const BODY_FILE: &str = "config.json";
const META_FILE: &str = "meta.json";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CacheMeta {
    pub url: String,
    pub sha256: String,
    pub etag: Option<String>,
    pub fetched_at: DateTime<Utc>,
}

pub struct ConfigCache {
    root: PathBuf,
    fetcher: Arc<dyn ConfigFetcher>,
    label_locks: Mutex<HashMap<String, Arc<Mutex<()>>>>,
}

impl std::fmt::Debug for ConfigCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConfigCache")
            .field("root", &self.root)
            .finish_non_exhaustive()
    }
}

fn sha256_hex(bytes: &[u8]) -> String {
    hex::encode(Sha256::digest(bytes))
}

fn validate_label(label: &str) -> CacheResult<()> {
    let valid = !label.is_empty()
        && label
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
    if valid {
        Ok(())
    } else {
        Err(CacheError::InvalidLabel(label.to_string()))
    }
}

/// Writes `bytes` to `dest` via a uniquely named sibling temp file.
fn write_atomic(dest: &Path, bytes: &[u8]) -> CacheResult<()> {
    let dir = dest
        .parent()
        .ok_or_else(|| std::io::Error::other("cache file has no parent directory"))?;
    let tmp = dir.join(format!(".{}.tmp", uuid::Uuid::new_v4()));
    let result = (|| -> std::io::Result<()> {
        let mut file = fs::File::create(&tmp)?;
        file.write_all(bytes)?;
        file.sync_all()?;
        fs::rename(&tmp, dest)
    })();
    if result.is_err() {
        let _ = fs::remove_file(&tmp);
    }
    Ok(result?)
}

impl ConfigCache {
    /// Creates the cache root if needed and uses the default HTTPS fetcher.
    pub fn new(base_dir: impl Into<PathBuf>, config: CacheConfig) -> CacheResult<Self> {
        let fetcher = HttpFetcher::new(config)?;
        Self::with_fetcher(base_dir, Arc::new(fetcher))
    }

    pub fn with_fetcher(
        base_dir: impl Into<PathBuf>,
        fetcher: Arc<dyn ConfigFetcher>,
    ) -> CacheResult<Self> {
        let root = base_dir.into();
        fs::create_dir_all(&root)?;
        Ok(Self {
            root,
            fetcher,
            label_locks: Mutex::new(HashMap::new()),
        })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn label_dir(&self, label: &str) -> PathBuf {
        self.root.join(label)
    }

    fn label_lock(&self, label: &str) -> Arc<Mutex<()>> {
        let mut locks = self
            .label_locks
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        Arc::clone(locks.entry(label.to_string()).or_default())
    }

    /// Turns a validated URL into a local path. `file://` paths are returned
    /// as-is; `https://` goes through [`Self::verify_or_fetch`].
    pub fn resolve(&self, url: &ConfigUrl, label: &str) -> CacheResult<PathBuf> {
        match url {
            ConfigUrl::File(path) => Ok(path.clone()),
            ConfigUrl::Https(url) => self.verify_or_fetch(url, label),
        }
    }

    /// The meta of a valid cached copy of `url` under `label`, if any.
    pub fn cached_meta(&self, url: &str, label: &str) -> CacheResult<Option<CacheMeta>> {
        validate_label(label)?;
        Ok(self.read_valid_meta(url, label))
    }

    fn read_valid_meta(&self, url: &str, label: &str) -> Option<CacheMeta> {
        let dir = self.label_dir(label);
        let meta: CacheMeta = match fs::read(dir.join(META_FILE)) {
            Ok(bytes) => match serde_json::from_slice(&bytes) {
                Ok(meta) => meta,
                Err(e) => {
                    warn!("Ignoring unreadable cache meta for {}: {}", label, e);
                    return None;
                }
            },
            Err(_) => return None,
        };
        if meta.url != url {
            debug!("Cache for {} holds {}, wanted {}", label, meta.url, url);
            return None;
        }
        let body = fs::read(dir.join(BODY_FILE)).ok()?;
        if sha256_hex(&body) != meta.sha256 {
            warn!("Cached config for {} failed its integrity check", label);
            return None;
        }
        Some(meta)
    }

    /// Returns a path to a trustworthy local copy of `url`.
    ///
    /// A valid cached copy is revalidated with its ETag. If the fetch fails or
    /// returns a body that is not JSON, the cached copy is used anyway; without
    /// one the error is returned.
    pub fn verify_or_fetch(&self, url: &str, label: &str) -> CacheResult<PathBuf> {
        validate_label(label)?;
        let lock = self.label_lock(label);
        let _guard = lock.lock().unwrap_or_else(PoisonError::into_inner);

        let dir = self.label_dir(label);
        let body_path = dir.join(BODY_FILE);
        let cached = self.read_valid_meta(url, label);
        let etag = cached.as_ref().and_then(|m| m.etag.as_deref());

        let fetched = self.fetcher.fetch(url, etag).and_then(|outcome| {
            if let FetchOutcome::Fetched { body, .. } = &outcome {
                serde_json::from_slice::<IgnoredAny>(body).map_err(|source| {
                    CacheError::InvalidBody {
                        url: url.to_string(),
                        source,
                    }
                })?;
            }
            Ok(outcome)
        });

        match fetched {
            Ok(FetchOutcome::NotModified) if cached.is_some() => {
                debug!("Cached config for {} is current", label);
                Ok(body_path)
            }
            Ok(FetchOutcome::NotModified) => Err(CacheError::NotModifiedWithoutCache(url.to_string())),
            Ok(FetchOutcome::Fetched { body, etag }) => {
                fs::create_dir_all(&dir)?;
                write_atomic(&body_path, &body)?;
                let meta = CacheMeta {
                    url: url.to_string(),
                    sha256: sha256_hex(&body),
                    etag,
                    fetched_at: Utc::now(),
                };
                write_atomic(&dir.join(META_FILE), &serde_json::to_vec_pretty(&meta)?)?;
                info!("Cached {} bytes of config for {}", body.len(), label);
                Ok(body_path)
            }
            Err(e) => match cached {
                Some(meta) => {
                    warn!(
                        "Fetching config for {} failed, using copy from {}: {}",
                        label, meta.fetched_at, e
                    );
                    Ok(body_path)
                }
                None => Err(e),
            },
        }
    }

    /// Removes the cached copy for `label`. Missing entries are not an error.
    pub fn invalidate(&self, label: &str) -> CacheResult<()> {
        validate_label(label)?;
        let lock = self.label_lock(label);
        let _guard = lock.lock().unwrap_or_else(PoisonError::into_inner);
        match fs::remove_dir_all(self.label_dir(label)) {
            Ok(()) => {
                debug!("Invalidated cache for {}", label);
                Ok(())
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}
