// src/ingest/providers/twitter.rs
use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use metrics::{counter, histogram};
use reqwest::StatusCode;
use serde::Deserialize;

use crate::config::TwitterCredentials;
use crate::ingest::fetch::{fetch_with_retry, AttemptError, RetryPolicy};
use crate::ingest::types::{Platform, RawPost, SourceProvider};

const SEARCH_RECENT_URL: &str = "https://api.twitter.com/2/tweets/search/recent";
const TWEET_FIELDS: &str = "created_at,text,author_id";

#[derive(Debug, Deserialize)]
struct SearchResponse {
    // Absent entirely when the query matched nothing.
    #[serde(default)]
    data: Vec<Tweet>,
}

#[derive(Debug, Deserialize)]
struct Tweet {
    text: String,
    created_at: Option<String>,
}

fn parse_rfc3339_to_utc(ts: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(ts)
        .ok()
        .map(|dt| dt.with_timezone(&Utc))
}

/// Parse a recent-search response body into raw posts for `handle`.
pub fn parse_search_body(body: &str, handle: &str) -> Result<Vec<RawPost>> {
    let resp: SearchResponse =
        serde_json::from_str(body).context("decoding twitter search response")?;
    let out = resp
        .data
        .into_iter()
        .map(|t| RawPost {
            platform: Platform::Twitter,
            origin: handle.to_string(),
            author: Some(handle.to_string()),
            title: None,
            text: t.text,
            upvotes: None,
            comments: None,
            created_at: t.created_at.as_deref().and_then(parse_rfc3339_to_utc),
            url: None,
        })
        .collect();
    Ok(out)
}

/// Twitter v2 recent-search client, one request per handle.
pub struct TwitterProvider {
    client: reqwest::Client,
    bearer_token: String,
    retry: RetryPolicy,
}

impl TwitterProvider {
    pub fn new(creds: &TwitterCredentials, retry: RetryPolicy) -> Self {
        Self {
            client: reqwest::Client::new(),
            bearer_token: creds.bearer_token.clone(),
            retry,
        }
    }
}

#[async_trait]
impl SourceProvider for TwitterProvider {
    async fn fetch_source(&self, handle: &str) -> Result<Vec<RawPost>> {
        let t0 = std::time::Instant::now();
        let query = format!("from:{handle}");

        let client = self.client.clone();
        let token = self.bearer_token.clone();
        let q = query.clone();
        let h = handle.to_string();
        let posts = fetch_with_retry(&query, self.retry, move || {
            let client = client.clone();
            let token = token.clone();
            let q = q.clone();
            let h = h.clone();
            async move {
                let resp = client
                    .get(SEARCH_RECENT_URL)
                    .bearer_auth(&token)
                    .query(&[("query", q.as_str()), ("tweet.fields", TWEET_FIELDS)])
                    .send()
                    .await
                    .map_err(|e| AttemptError::Transport(e.into()))?;

                if resp.status() == StatusCode::TOO_MANY_REQUESTS {
                    return Err(AttemptError::RateLimited);
                }
                let resp = resp
                    .error_for_status()
                    .map_err(|e| AttemptError::Http(e.into()))?;
                let body = resp
                    .text()
                    .await
                    .map_err(|e| AttemptError::Http(e.into()))?;
                parse_search_body(&body, &h).map_err(AttemptError::Http)
            }
        })
        .await?;

        histogram!("curator_fetch_ms").record(t0.elapsed().as_secs_f64() * 1_000.0);
        counter!("curator_posts_fetched_total").increment(posts.len() as u64);
        Ok(posts)
    }

    fn platform(&self) -> Platform {
        Platform::Twitter
    }
}
