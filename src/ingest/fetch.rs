// src/ingest/fetch.rs
use std::future::Future;
use std::time::Duration;

use anyhow::{anyhow, Result};
use metrics::counter;

/// Retry budget for rate-limited endpoints. Retries re-issue the identical
/// request after a constant pause; the delay does not grow between attempts.
#[derive(Debug, Clone, Copy)]
pub struct RetryPolicy {
    /// Additional attempts after the first. `max_retries = 4` means at most
    /// five attempts total.
    pub max_retries: u32,
    pub delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: 4,
            delay: Duration::from_secs(30),
        }
    }
}

/// Outcome of a single HTTP attempt, classified by the caller.
#[derive(Debug)]
pub enum AttemptError {
    /// HTTP 429 — the only signal that buys another attempt.
    RateLimited,
    /// Any other HTTP error status, or a body that failed to decode. Terminal.
    Http(anyhow::Error),
    /// Connection or timeout failure with no HTTP status. Terminal, no retry.
    Transport(anyhow::Error),
}

/// Run `attempt` until it succeeds, a non-retryable error occurs, or the
/// rate-limit budget is exhausted.
pub async fn fetch_with_retry<T, F, Fut>(query: &str, policy: RetryPolicy, mut attempt: F) -> Result<T>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = std::result::Result<T, AttemptError>>,
{
    let mut remaining = policy.max_retries;
    loop {
        match attempt().await {
            Ok(v) => return Ok(v),
            Err(AttemptError::RateLimited) if remaining > 0 => {
                tracing::warn!(
                    query,
                    retries_remaining = remaining,
                    delay_secs = policy.delay.as_secs(),
                    "rate limit exceeded, pausing before retry"
                );
                counter!("curator_rate_limit_retries_total").increment(1);
                tokio::time::sleep(policy.delay).await;
                remaining -= 1;
            }
            Err(AttemptError::RateLimited) => {
                return Err(anyhow!("rate limit retries exhausted for `{query}`"));
            }
            Err(AttemptError::Http(e)) => {
                return Err(e.context(format!("HTTP error for `{query}`")));
            }
            Err(AttemptError::Transport(e)) => {
                return Err(e.context(format!("request failed for `{query}`")));
            }
        }
    }
}
