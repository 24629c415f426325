//! Remote config transport.

use crate::config::CacheConfig;
use crate::error::{CacheError, CacheResult};
use reqwest::StatusCode;
use reqwest::blocking::Client;
use reqwest::header::{ETAG, IF_NONE_MATCH};
use tracing::{debug, warn};

/// Result of a conditional fetch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchOutcome {
    Fetched { body: Vec<u8>, etag: Option<String> },
    /// The server confirmed the copy identified by the supplied ETag is current.
    NotModified,
}

/// Fetches a config document. `etag` is the validator of the cached copy,
/// if there is one.
pub trait ConfigFetcher: Send + Sync {
    fn fetch(&self, url: &str, etag: Option<&str>) -> CacheResult<FetchOutcome>;
}

/// Blocking HTTPS fetcher with retry and exponential backoff.
///
/// Network errors and 5xx responses are retried; other statuses fail at once.
pub struct HttpFetcher {
    client: Client,
    config: CacheConfig,
}

impl HttpFetcher {
    /// Builds the HTTP client. Must not be called from inside an async runtime.
    pub fn new(config: CacheConfig) -> CacheResult<Self> {
        let client = Client::builder()
            .timeout(config.timeout())
            .user_agent(config.user_agent.clone())
            .build()?;
        Ok(Self { client, config })
    }

    fn fetch_once(&self, url: &str, etag: Option<&str>) -> CacheResult<FetchOutcome> {
        let mut request = self.client.get(url);
        if let Some(etag) = etag {
            request = request.header(IF_NONE_MATCH, etag);
        }
        let response = request.send()?;
        let status = response.status();

        if status == StatusCode::NOT_MODIFIED {
            return Ok(FetchOutcome::NotModified);
        }
        if !status.is_success() {
            return Err(CacheError::HttpStatus {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }

        let etag = response
            .headers()
            .get(ETAG)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);
        let body = response.bytes()?.to_vec();
        Ok(FetchOutcome::Fetched { body, etag })
    }
}

impl ConfigFetcher for HttpFetcher {
    fn fetch(&self, url: &str, etag: Option<&str>) -> CacheResult<FetchOutcome> {
        let attempts = self.config.max_attempts.max(1);
        let mut attempt = 1;
        loop {
            match self.fetch_once(url, etag) {
                Ok(outcome) => {
                    debug!("Fetched {} on attempt {}", url, attempt);
                    return Ok(outcome);
                }
                Err(e) if e.is_transient() && attempt < attempts => {
                    let delay = self.config.backoff_delay(attempt);
                    warn!(
                        "Fetching {} failed (attempt {}/{}): {}. Retrying in {:?}",
                        url, attempt, attempts, e, delay
                    );
                    std::thread::sleep(delay);
                    attempt += 1;
                }
                Err(e) if e.is_transient() => {
                    return Err(CacheError::RetriesExhausted {
                        url: url.to_string(),
                        attempts,
                        last_error: e.to_string(),
                    });
                }
                Err(e) => return Err(e),
            }
        }
    }
}
