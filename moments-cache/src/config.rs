use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Fetch policy for the remote config.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    /// Total attempts per fetch, including the first.
    pub max_attempts: u32,
    /// Delay before the first retry; doubles for each later one.
    pub backoff_base_ms: u64,
    /// Per-request timeout.
    pub timeout_secs: u64,
    pub user_agent: String,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            backoff_base_ms: 250,
            timeout_secs: 30,
            user_agent: format!("Moments/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

impl CacheConfig {
    /// Delay to wait after failed attempt number `attempt` (1-based).
    #[must_use]
    pub fn backoff_delay(&self, attempt: u32) -> Duration {
        let factor = 2u64.saturating_pow(attempt.saturating_sub(1));
        Duration::from_millis(self.backoff_base_ms.saturating_mul(factor))
    }

    #[must_use]
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}
