// src/ingest/types.rs
use anyhow::Result;
use chrono::{DateTime, NaiveDate, Utc};

#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum Platform {
    Twitter,
    Reddit,
}

impl Platform {
    pub fn as_str(&self) -> &'static str {
        match self {
            Platform::Twitter => "Twitter",
            Platform::Reddit => "Reddit",
        }
    }
}

/// Raw post as one platform fetch returned it, before window filtering.
#[derive(Debug, Clone, PartialEq)]
pub struct RawPost {
    pub platform: Platform,
    /// Subreddit name or author handle this post was fetched for.
    pub origin: String,
    /// None when the platform no longer has the account (deleted Reddit users).
    pub author: Option<String>,
    pub title: Option<String>,
    /// Tweet text or post selftext. May be empty (link posts).
    pub text: String,
    pub upvotes: Option<i64>,
    pub comments: Option<u64>,
    /// None when the platform timestamp was absent or unparseable.
    pub created_at: Option<DateTime<Utc>>,
    pub url: Option<String>,
}

/// Normalized, window-filtered record. This is what the CSV sink serializes
/// and what gets handed to the downstream article generator.
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct CanonicalRecord {
    pub platform: Platform,
    pub origin: String,
    pub author: String,
    pub title: Option<String>,
    pub text: String,
    pub upvotes: Option<i64>,
    pub comments: Option<u64>,
    pub created_at: DateTime<Utc>,
    pub url: Option<String>,
}

/// Inclusive retention window. Computed once per run as the current UTC
/// calendar day and immutable for the run's lifetime.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FetchWindow {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl FetchWindow {
    pub fn today_utc() -> Self {
        Self::for_day(Utc::now().date_naive())
    }

    pub fn for_day(day: NaiveDate) -> Self {
        let start = day.and_hms_opt(0, 0, 0).expect("midnight is valid").and_utc();
        let end = day
            .and_hms_milli_opt(23, 59, 59, 999)
            .expect("end of day is valid")
            .and_utc();
        Self { start, end }
    }

    /// Inclusive on both ends.
    pub fn contains(&self, ts: DateTime<Utc>) -> bool {
        self.start <= ts && ts <= self.end
    }
}

/// One platform client. `fetch_source` pulls the newest posts for a single
/// source identifier; the collector drives it over the configured list.
#[async_trait::async_trait]
pub trait SourceProvider: Send + Sync {
    async fn fetch_source(&self, source: &str) -> Result<Vec<RawPost>>;
    fn platform(&self) -> Platform;
}
