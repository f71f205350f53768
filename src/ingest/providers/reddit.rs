// src/ingest/providers/reddit.rs
use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use metrics::{counter, histogram};
use reqwest::StatusCode;
use serde::Deserialize;
use tokio::sync::Mutex;

use crate::config::RedditCredentials;
use crate::ingest::fetch::{fetch_with_retry, AttemptError, RetryPolicy};
use crate::ingest::types::{Platform, RawPost, SourceProvider};

const TOKEN_URL: &str = "https://www.reddit.com/api/v1/access_token";
const OAUTH_BASE: &str = "https://oauth.reddit.com";

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
}

#[derive(Debug, Deserialize)]
struct Listing {
    data: ListingData,
}

#[derive(Debug, Deserialize)]
struct ListingData {
    #[serde(default)]
    children: Vec<Child>,
}

#[derive(Debug, Deserialize)]
struct Child {
    data: RedditPost,
}

#[derive(Debug, Deserialize)]
struct RedditPost {
    #[serde(default)]
    title: String,
    // Null when the account was deleted.
    #[serde(default)]
    author: Option<String>,
    #[serde(default)]
    score: i64,
    #[serde(default)]
    num_comments: u64,
    // Epoch seconds as a float.
    created_utc: Option<f64>,
    #[serde(default)]
    url: Option<String>,
    #[serde(default)]
    selftext: String,
}

fn epoch_to_utc(secs: f64) -> Option<DateTime<Utc>> {
    DateTime::from_timestamp(secs as i64, 0)
}

/// Parse a `/r/<subreddit>/new` listing body into raw posts.
pub fn parse_listing(body: &str, subreddit: &str) -> Result<Vec<RawPost>> {
    let listing: Listing = serde_json::from_str(body).context("decoding reddit listing")?;
    let out = listing
        .data
        .children
        .into_iter()
        .map(|c| {
            let p = c.data;
            RawPost {
                platform: Platform::Reddit,
                origin: subreddit.to_string(),
                author: p.author,
                title: Some(p.title),
                text: p.selftext,
                upvotes: Some(p.score),
                comments: Some(p.num_comments),
                created_at: p.created_utc.and_then(epoch_to_utc),
                url: p.url,
            }
        })
        .collect();
    Ok(out)
}

/// Reddit script-app client: client-credentials OAuth, then the newest N
/// posts per subreddit. The token is fetched lazily and cached for the run;
/// a token failure fails only the source being fetched.
pub struct RedditProvider {
    client: reqwest::Client,
    creds: RedditCredentials,
    posts_per_subreddit: u32,
    retry: RetryPolicy,
    token: Mutex<Option<String>>,
}

impl RedditProvider {
    pub fn new(creds: &RedditCredentials, posts_per_subreddit: u32, retry: RetryPolicy) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(creds.user_agent.clone())
            .build()
            .context("building reddit http client")?;
        Ok(Self {
            client,
            creds: creds.clone(),
            posts_per_subreddit,
            retry,
            token: Mutex::new(None),
        })
    }

    async fn access_token(&self) -> Result<String> {
        let mut cached = self.token.lock().await;
        if let Some(tok) = cached.as_ref() {
            return Ok(tok.clone());
        }
        let resp = self
            .client
            .post(TOKEN_URL)
            .basic_auth(&self.creds.client_id, Some(&self.creds.client_secret))
            .form(&[("grant_type", "client_credentials")])
            .send()
            .await
            .context("requesting reddit access token")?
            .error_for_status()
            .context("reddit token endpoint rejected credentials")?;
        let tok: TokenResponse = resp.json().await.context("decoding reddit token response")?;
        *cached = Some(tok.access_token.clone());
        Ok(tok.access_token)
    }
}

#[async_trait]
impl SourceProvider for RedditProvider {
    async fn fetch_source(&self, subreddit: &str) -> Result<Vec<RawPost>> {
        let t0 = std::time::Instant::now();
        let token = self.access_token().await?;
        let url = format!("{OAUTH_BASE}/r/{subreddit}/new");
        let limit = self.posts_per_subreddit.to_string();

        let client = self.client.clone();
        let sub = subreddit.to_string();
        let posts = fetch_with_retry(subreddit, self.retry, move || {
            let client = client.clone();
            let token = token.clone();
            let url = url.clone();
            let limit = limit.clone();
            let sub = sub.clone();
            async move {
                let resp = client
                    .get(&url)
                    .bearer_auth(&token)
                    .query(&[("limit", limit.as_str())])
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
                parse_listing(&body, &sub).map_err(AttemptError::Http)
            }
        })
        .await?;

        histogram!("curator_fetch_ms").record(t0.elapsed().as_secs_f64() * 1_000.0);
        counter!("curator_posts_fetched_total").increment(posts.len() as u64);
        Ok(posts)
    }

    fn platform(&self) -> Platform {
        Platform::Reddit
    }
}
