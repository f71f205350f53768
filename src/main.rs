//! AI Social Curator — Binary Entrypoint
//! Collects today's AI posts from Twitter and Reddit, filters them to the
//! current UTC calendar day, and writes one CSV per platform for the
//! downstream article generator.

use anyhow::Result;
use chrono::Utc;
use metrics::gauge;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use ai_social_curator::config::CuratorConfig;
use ai_social_curator::export::{write_reddit_csv, write_tweets_csv, WriteReport};
use ai_social_curator::ingest::providers::{reddit::RedditProvider, twitter::TwitterProvider};
use ai_social_curator::ingest::types::FetchWindow;
use ai_social_curator::ingest::{run_platform, CuratedBatch};

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().compact())
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env in local/dev; no-op in environments that set real vars.
    let _ = dotenvy::dotenv();
    init_tracing();

    // Credentials are validated here, before any network call.
    let cfg = CuratorConfig::from_env()?;

    let window = FetchWindow::today_utc();
    tracing::info!(start = %window.start, end = %window.end, "curating posts for the current UTC day");

    let twitter = TwitterProvider::new(&cfg.twitter, cfg.retry);
    let tweets = run_platform(&twitter, &cfg.sources.handles, &window).await;

    let reddit = RedditProvider::new(&cfg.reddit, cfg.sources.posts_per_subreddit, cfg.retry)?;
    let posts = run_platform(&reddit, &cfg.sources.subreddits, &window).await;

    let batch = CuratedBatch {
        twitter: tweets,
        reddit: posts,
    };

    report(write_tweets_csv(&batch.twitter, &cfg.twitter_output)?, "tweets");
    report(write_reddit_csv(&batch.reddit, &cfg.reddit_output)?, "reddit posts");

    gauge!("curator_last_run_ts").set(Utc::now().timestamp() as f64);
    tracing::info!(
        handles = cfg.sources.handles.len(),
        subreddits = cfg.sources.subreddits.len(),
        tweets = batch.twitter.len(),
        reddit_posts = batch.reddit.len(),
        "curation run finished"
    );
    Ok(())
}

fn report(report: WriteReport, what: &str) {
    match report {
        WriteReport::NoItems => {
            tracing::info!("no {what} found for today, nothing written");
        }
        WriteReport::Written { path, rows } => {
            tracing::info!(rows, path = %path.display(), "{what} saved");
        }
    }
}
