// src/ingest/mod.rs
pub mod fetch;
pub mod providers;
pub mod types;

use metrics::{counter, describe_counter, describe_gauge, describe_histogram};
use once_cell::sync::OnceCell;

use crate::ingest::types::{CanonicalRecord, FetchWindow, RawPost, SourceProvider};

/// Sentinel substituted when the platform no longer has the author account.
pub const DELETED_AUTHOR: &str = "Deleted";

/// One-time metrics registration.
fn ensure_metrics_described() {
    static ONCE: OnceCell<()> = OnceCell::new();
    ONCE.get_or_init(|| {
        describe_counter!(
            "curator_posts_fetched_total",
            "Raw posts returned by platform fetches."
        );
        describe_counter!("curator_kept_total", "Records kept after window filtering.");
        describe_counter!(
            "curator_window_rejected_total",
            "Posts rejected by the UTC-day window."
        );
        describe_counter!(
            "curator_source_errors_total",
            "Source fetch failures (source skipped, run continues)."
        );
        describe_counter!(
            "curator_rate_limit_retries_total",
            "Retries triggered by HTTP 429."
        );
        describe_histogram!("curator_fetch_ms", "Per-source fetch time in milliseconds.");
        describe_gauge!("curator_last_run_ts", "Unix ts when the curation run last finished.");
    });
}

/// Iterate one platform's source list in order, fetching each source once.
/// A failing source is logged and skipped; the batch keeps whatever the
/// other sources returned. An empty batch is a valid, non-error result.
pub async fn collect_sources(provider: &dyn SourceProvider, sources: &[String]) -> Vec<RawPost> {
    ensure_metrics_described();

    let mut all = Vec::new();
    for source in sources {
        tracing::info!(
            platform = provider.platform().as_str(),
            source = source.as_str(),
            "fetching source"
        );
        match provider.fetch_source(source).await {
            Ok(mut posts) => {
                tracing::info!(source = source.as_str(), count = posts.len(), "source fetched");
                all.append(&mut posts);
            }
            Err(e) => {
                tracing::warn!(error = ?e, source = source.as_str(), "source fetch failed, skipping");
                counter!("curator_source_errors_total").increment(1);
            }
        }
    }
    all
}

/// Keep posts created inside `window` (inclusive on both ends) and map the
/// survivors into canonical records. Posts with no usable timestamp are
/// rejected. Returns kept records plus the rejected count; order is
/// preserved and no deduplication is applied.
pub fn filter_window(raw: Vec<RawPost>, window: &FetchWindow) -> (Vec<CanonicalRecord>, usize) {
    let mut rejected = 0usize;
    let mut kept = Vec::with_capacity(raw.len());

    for post in raw {
        let Some(created_at) = post.created_at else {
            rejected += 1;
            continue;
        };
        if !window.contains(created_at) {
            rejected += 1;
            continue;
        }
        kept.push(CanonicalRecord {
            platform: post.platform,
            origin: post.origin,
            author: post.author.unwrap_or_else(|| DELETED_AUTHOR.to_string()),
            title: post.title,
            text: post.text,
            upvotes: post.upvotes,
            comments: post.comments,
            created_at,
            url: post.url,
        });
    }

    counter!("curator_window_rejected_total").increment(rejected as u64);
    (kept, rejected)
}

/// One full curation pass over a platform: collect, then window-filter.
pub async fn run_platform(
    provider: &dyn SourceProvider,
    sources: &[String],
    window: &FetchWindow,
) -> Vec<CanonicalRecord> {
    let raw = collect_sources(provider, sources).await;
    let (kept, rejected) = filter_window(raw, window);

    counter!("curator_kept_total").increment(kept.len() as u64);
    tracing::info!(
        platform = provider.platform().as_str(),
        kept = kept.len(),
        rejected,
        "window filter applied"
    );
    kept
}

/// The two filtered lists handed to the downstream article generator.
#[derive(Debug, Clone, PartialEq)]
pub struct CuratedBatch {
    pub twitter: Vec<CanonicalRecord>,
    pub reddit: Vec<CanonicalRecord>,
}
