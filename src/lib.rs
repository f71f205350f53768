// src/lib.rs
// Public library surface for integration tests (and potential reuse).

pub mod config;
pub mod export;
pub mod ingest;

// ---- Re-exports for stable public API ----
pub use crate::export::{write_reddit_csv, write_tweets_csv, WriteReport};
pub use crate::ingest::types::{CanonicalRecord, FetchWindow, Platform, RawPost, SourceProvider};
pub use crate::ingest::{collect_sources, filter_window, run_platform, CuratedBatch};
