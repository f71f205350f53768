// tests/fetch_retry.rs
use std::sync::atomic::{AtomicU32, Ordering};
use std::time::Duration;

use anyhow::anyhow;

use ai_social_curator::ingest::fetch::{fetch_with_retry, AttemptError, RetryPolicy};

fn instant_policy() -> RetryPolicy {
    RetryPolicy {
        max_retries: 4,
        delay: Duration::ZERO,
    }
}

#[tokio::test]
async fn rate_limited_is_attempted_budget_plus_one_times() {
    let attempts = AtomicU32::new(0);
    let result: anyhow::Result<()> = fetch_with_retry("from:karpathy", instant_policy(), || {
        attempts.fetch_add(1, Ordering::SeqCst);
        async { Err::<(), _>(AttemptError::RateLimited) }
    })
    .await;

    assert!(result.is_err());
    assert_eq!(
        attempts.load(Ordering::SeqCst),
        5,
        "4 retries means exactly 5 attempts"
    );
}

#[tokio::test]
async fn success_after_three_rate_limits() {
    let attempts = AtomicU32::new(0);
    let tweets = fetch_with_retry("from:karpathy", instant_policy(), || {
        let n = attempts.fetch_add(1, Ordering::SeqCst);
        async move {
            if n < 3 {
                Err(AttemptError::RateLimited)
            } else {
                Ok(vec!["one tweet dated today"])
            }
        }
    })
    .await
    .unwrap();

    assert_eq!(tweets.len(), 1);
    assert_eq!(attempts.load(Ordering::SeqCst), 4);
}

#[tokio::test]
async fn first_success_makes_a_single_attempt() {
    let attempts = AtomicU32::new(0);
    let out = fetch_with_retry("from:karpathy", instant_policy(), || {
        attempts.fetch_add(1, Ordering::SeqCst);
        async { Ok::<_, AttemptError>(42) }
    })
    .await
    .unwrap();

    assert_eq!(out, 42);
    assert_eq!(attempts.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn other_http_errors_are_not_retried() {
    let attempts = AtomicU32::new(0);
    let result: anyhow::Result<()> = fetch_with_retry("from:karpathy", instant_policy(), || {
        attempts.fetch_add(1, Ordering::SeqCst);
        async { Err::<(), _>(AttemptError::Http(anyhow!("403 Forbidden"))) }
    })
    .await;

    assert!(result.is_err());
    assert_eq!(attempts.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn transport_errors_are_not_retried() {
    let attempts = AtomicU32::new(0);
    let result: anyhow::Result<()> = fetch_with_retry("from:karpathy", instant_policy(), || {
        attempts.fetch_add(1, Ordering::SeqCst);
        async { Err::<(), _>(AttemptError::Transport(anyhow!("connection refused"))) }
    })
    .await;

    assert!(result.is_err());
    assert_eq!(attempts.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn exhaustion_error_names_the_query() {
    let result: anyhow::Result<()> = fetch_with_retry("from:OpenAI", instant_policy(), || async {
        Err::<(), _>(AttemptError::RateLimited)
    })
    .await;

    let err = result.unwrap_err();
    assert!(err.to_string().contains("from:OpenAI"));
}
