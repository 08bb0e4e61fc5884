//! Configuration types for the NextSound clients.

use crate::error::{ClientError, Result};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Endpoints and network policy shared by every client.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    /// iTunes Search API base URL
    pub itunes_url: String,

    /// Deezer API base URL
    pub deezer_url: String,

    /// Favorites service base URL (PostgREST-style)
    pub favorites_url: Option<String>,

    /// Public API key sent as `apikey` to the favorites service
    pub favorites_api_key: Option<String>,

    /// Per-request timeout in milliseconds
    pub timeout_ms: u64,

    /// Retry policy for transient failures
    pub retry: RetryPolicy,

    pub user_agent: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            itunes_url: "https://itunes.apple.com".to_string(),
            deezer_url: "https://api.deezer.com".to_string(),
            favorites_url: None,
            favorites_api_key: None,
            timeout_ms: 10_000,
            retry: RetryPolicy::default(),
            user_agent: format!("NextSound/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

impl ClientConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    /// Longest a request can take with every attempt timing out
    pub fn retry_budget(&self) -> Duration {
        let attempts = self.retry.attempts.max(1);
        self.timeout() * attempts + self.retry.total_backoff(attempts)
    }

    /// Copy whose whole retry budget fits inside `deadline`
    ///
    /// Drops attempts while their backoff alone would use up the deadline,
    /// then shares what is left between the remaining attempts. Never
    /// lengthens the configured timeout.
    pub fn within_deadline(&self, deadline: Duration) -> Self {
        let mut attempts = self.retry.attempts.max(1);
        while attempts > 1 && self.retry.total_backoff(attempts) >= deadline {
            attempts -= 1;
        }
        let per_attempt = deadline.saturating_sub(self.retry.total_backoff(attempts)) / attempts;
        let per_attempt_ms = u64::try_from(per_attempt.as_millis()).unwrap_or(u64::MAX);

        let mut config = self.clone();
        config.retry.attempts = attempts;
        config.timeout_ms = self.timeout_ms.min(per_attempt_ms).max(1);
        config
    }
}

/// Bounded retry with linear backoff
///
/// Attempt `n` (1-based) that fails transiently waits `backoff * n` before
/// the next one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RetryPolicy {
    pub attempts: u32,
    pub backoff_ms: u64,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            attempts: 3,
            backoff_ms: 1_000,
        }
    }
}

impl RetryPolicy {
    /// No retries
    pub fn none() -> Self {
        Self {
            attempts: 1,
            backoff_ms: 0,
        }
    }

    /// Delay after the given failed attempt
    pub fn delay_after(&self, attempt: u32) -> Duration {
        Duration::from_millis(self.backoff_ms.saturating_mul(u64::from(attempt)))
    }

    /// Sum of the delays between `attempts` tries
    pub fn total_backoff(&self, attempts: u32) -> Duration {
        (1..attempts).map(|attempt| self.delay_after(attempt)).sum()
    }
}

/// Normalize and validate a base URL: http(s) only, no trailing slash.
pub fn normalize_base_url(raw: &str) -> Result<String> {
    let trimmed = raw.trim().trim_end_matches('/');
    if trimmed.is_empty() {
        return Err(ClientError::InvalidUrl("URL cannot be empty".into()));
    }

    let parsed = url::Url::parse(trimmed).map_err(|e| ClientError::InvalidUrl(format!("{trimmed}: {e}")))?;
    if !matches!(parsed.scheme(), "http" | "https") {
        return Err(ClientError::InvalidUrl(
            "URL must start with http:// or https://".into(),
        ));
    }
    Ok(trimmed.to_string())
}
