// src/config.rs
//! Run configuration: platform credentials from the environment, source
//! lists from `config/sources.toml` (or an explicit path), with compiled-in
//! defaults. Credentials are validated before any network call; a missing
//! variable aborts the run.

use anyhow::{anyhow, Context, Result};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use crate::ingest::fetch::RetryPolicy;

pub const ENV_SOURCES_PATH: &str = "CURATOR_SOURCES_PATH";
const DEFAULT_SOURCES_PATH: &str = "config/sources.toml";

const DEFAULT_SUBREDDITS: &[&str] = &[
    "MachineLearning",
    "technology",
    "singularity",
    "ArtificialInteligence",
    "compsci",
    "DarkFuturology",
];

const DEFAULT_HANDLES: &[&str] = &[
    "svpino",
    "OpenAI",
    "AndrewYNg",
    "karpathy",
    "drfeifei",
    "huggingface",
    "ylecun",
    "fchollet",
    "KirkDBorne",
];

const DEFAULT_POSTS_PER_SUBREDDIT: u32 = 50;

#[derive(Debug, Clone)]
pub struct RedditCredentials {
    pub client_id: String,
    pub client_secret: String,
    pub user_agent: String,
}

#[derive(Debug, Clone)]
pub struct TwitterCredentials {
    pub bearer_token: String,
}

/// Source lists for one run, fixed at configuration time.
#[derive(Debug, Clone, PartialEq, serde::Deserialize)]
pub struct SourceLists {
    #[serde(default = "default_subreddits")]
    pub subreddits: Vec<String>,
    #[serde(default = "default_handles")]
    pub handles: Vec<String>,
    #[serde(default = "default_posts_per_subreddit")]
    pub posts_per_subreddit: u32,
}

fn default_subreddits() -> Vec<String> {
    DEFAULT_SUBREDDITS.iter().map(|s| s.to_string()).collect()
}

fn default_handles() -> Vec<String> {
    DEFAULT_HANDLES.iter().map(|s| s.to_string()).collect()
}

fn default_posts_per_subreddit() -> u32 {
    DEFAULT_POSTS_PER_SUBREDDIT
}

impl Default for SourceLists {
    fn default() -> Self {
        Self {
            subreddits: default_subreddits(),
            handles: default_handles(),
            posts_per_subreddit: default_posts_per_subreddit(),
        }
    }
}

/// Load source lists from an explicit TOML path.
pub fn load_sources_from(path: &Path) -> Result<SourceLists> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("reading source lists from {}", path.display()))?;
    toml::from_str(&content).with_context(|| format!("parsing {}", path.display()))
}

/// Load source lists using env var + fallbacks:
/// 1) $CURATOR_SOURCES_PATH (error if set but non-existent)
/// 2) config/sources.toml
/// 3) compiled-in defaults
pub fn load_sources_default() -> Result<SourceLists> {
    if let Ok(p) = env::var(ENV_SOURCES_PATH) {
        let pb = PathBuf::from(p);
        if pb.exists() {
            return load_sources_from(&pb);
        }
        return Err(anyhow!("{ENV_SOURCES_PATH} points to non-existent path"));
    }
    let default_path = PathBuf::from(DEFAULT_SOURCES_PATH);
    if default_path.exists() {
        return load_sources_from(&default_path);
    }
    Ok(SourceLists::default())
}

/// Everything one curation run needs, built once at process entry and
/// threaded through the provider constructors.
#[derive(Debug, Clone)]
pub struct CuratorConfig {
    pub reddit: RedditCredentials,
    pub twitter: TwitterCredentials,
    pub sources: SourceLists,
    pub retry: RetryPolicy,
    pub twitter_output: PathBuf,
    pub reddit_output: PathBuf,
}

impl CuratorConfig {
    pub fn from_env() -> Result<Self> {
        let reddit = RedditCredentials {
            client_id: require_env("REDDIT_CLIENT_ID")?,
            client_secret: require_env("REDDIT_CLIENT_SECRET")?,
            user_agent: require_env("REDDIT_USER_AGENT")?,
        };
        let twitter = TwitterCredentials {
            bearer_token: require_env("TWITTER_BEARER_TOKEN")?,
        };
        let sources = load_sources_default()?;
        Ok(Self {
            reddit,
            twitter,
            sources,
            retry: RetryPolicy::default(),
            twitter_output: PathBuf::from("todays_tweets.csv"),
            reddit_output: PathBuf::from("reddit_data.csv"),
        })
    }
}

fn require_env(key: &str) -> Result<String> {
    env::var(key).map_err(|_| anyhow!("Missing {key} in environment variables"))
}
