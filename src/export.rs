// src/export.rs
//! Tabular sink: one CSV per platform. The whole batch is staged to a
//! sibling `.tmp` file and renamed into place, so a failed run never leaves
//! a partially written file behind. An empty batch writes nothing.

use anyhow::{Context, Result};
use chrono::SecondsFormat;
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};

use crate::ingest::types::CanonicalRecord;

/// Result of a sink write. An empty batch is reported, not written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WriteReport {
    NoItems,
    Written { path: PathBuf, rows: usize },
}

#[derive(Debug, Serialize)]
struct TweetRow<'a> {
    tweettext: &'a str,
    author: &'a str,
    date: String,
}

#[derive(Debug, Serialize)]
struct RedditRow<'a> {
    subreddit: &'a str,
    title: &'a str,
    author: &'a str,
    upvotes: i64,
    comments: u64,
    created_utc: String,
    url: &'a str,
    content: &'a str,
}

/// Columns: `tweettext, author, date`.
pub fn write_tweets_csv(records: &[CanonicalRecord], path: &Path) -> Result<WriteReport> {
    write_rows(path, records, |rec| TweetRow {
        tweettext: &rec.text,
        author: &rec.author,
        date: rec.created_at.to_rfc3339_opts(SecondsFormat::Millis, true),
    })
}

/// Columns: `subreddit, title, author, upvotes, comments, created_utc, url, content`.
pub fn write_reddit_csv(records: &[CanonicalRecord], path: &Path) -> Result<WriteReport> {
    write_rows(path, records, |rec| RedditRow {
        subreddit: &rec.origin,
        title: rec.title.as_deref().unwrap_or(""),
        author: &rec.author,
        upvotes: rec.upvotes.unwrap_or(0),
        comments: rec.comments.unwrap_or(0),
        created_utc: rec.created_at.format("%Y-%m-%d %H:%M:%S").to_string(),
        url: rec.url.as_deref().unwrap_or(""),
        content: &rec.text,
    })
}

fn write_rows<'r, R, T, F>(path: &Path, records: &'r [R], mut to_row: F) -> Result<WriteReport>
where
    T: Serialize,
    F: FnMut(&'r R) -> T,
{
    if records.is_empty() {
        return Ok(WriteReport::NoItems);
    }

    let tmp = staging_path(path);
    {
        let mut writer = csv::Writer::from_path(&tmp)
            .with_context(|| format!("creating {}", tmp.display()))?;
        for rec in records {
            writer.serialize(to_row(rec)).context("serializing csv row")?;
        }
        writer.flush().context("flushing csv writer")?;
    }
    fs::rename(&tmp, path)
        .with_context(|| format!("moving {} into place", tmp.display()))?;

    Ok(WriteReport::Written {
        path: path.to_path_buf(),
        rows: records.len(),
    })
}

fn staging_path(path: &Path) -> PathBuf {
    // rename() is only atomic within a filesystem, so stage next to the target.
    let mut os = path.as_os_str().to_owned();
    os.push(".tmp");
    PathBuf::from(os)
}
