//! Read-only Reddit client returning normalized records.
//!
//! [`RedditClient`] validates every parameter locally, forwards the request to
//! a [`RedditSource`] and normalizes what comes back. It performs no retries:
//! any failure reported by the source is returned to the caller as is.

pub mod http;

use crate::config::AppConfig;
use crate::error::RedditClientError;
use crate::models::{
    Comment, ListingKind, Post, SearchSort, SubredditInfo, SubredditStats, TimeFilter,
};
use crate::normalize::{normalize_comment, normalize_post, normalize_subreddit};
use crate::stats::summarize;
use async_trait::async_trait;
use chrono::Utc;
use log::{debug, info};
use serde_json::Value;

pub use http::HttpSession;

/// Default number of posts for listings and search
pub const DEFAULT_LIMIT: u32 = 10;
/// Default number of hot posts sampled by [`RedditClient::get_subreddit_stats`]
pub const DEFAULT_STATS_LIMIT: u32 = 100;
pub const DEFAULT_TOP_TIME_FILTER: &str = "day";
pub const DEFAULT_SEARCH_TIME_FILTER: &str = "all";
pub const DEFAULT_SEARCH_SORT: &str = "relevance";

/// Raw access to Reddit data.
///
/// Implementations return upstream objects untouched, either bare or wrapped
/// in a `{"kind", "data"}` envelope. Sequences are finite and should not
/// exceed the requested limit. Comments come flattened in depth-first order
/// with a `depth` field on every item.
#[async_trait]
pub trait RedditSource: Send + Sync {
    async fn listing(
        &self,
        subreddit: &str,
        kind: ListingKind,
        limit: u32,
    ) -> Result<Vec<Value>, RedditClientError>;

    async fn search(
        &self,
        subreddit: &str,
        query: &str,
        sort: SearchSort,
        time_filter: TimeFilter,
        limit: u32,
    ) -> Result<Vec<Value>, RedditClientError>;

    /// `limit` of `None` asks for every comment the source can deliver.
    async fn comments(
        &self,
        post_id: &str,
        limit: Option<u32>,
    ) -> Result<Vec<Value>, RedditClientError>;

    /// Fails with [`RedditClientError::NotFound`] for missing, private or banned subreddits.
    async fn subreddit_info(&self, subreddit: &str) -> Result<Value, RedditClientError>;
}

pub struct RedditClient<S = HttpSession> {
    source: S,
}

impl RedditClient<HttpSession> {
    /// Authenticate against Reddit with the given configuration and wrap the session.
    pub async fn connect(config: &AppConfig) -> Result<Self, RedditClientError> {
        let session = HttpSession::authenticate(config).await?;
        Ok(Self::new(session))
    }
}

impl<S: RedditSource> RedditClient<S> {
    pub fn new(source: S) -> Self {
        Self { source }
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    /// Fetch hot posts from a subreddit, in relevance order.
    pub async fn get_hot_posts(
        &self,
        subreddit: &str,
        limit: u32,
    ) -> Result<Vec<Post>, RedditClientError> {
        self.fetch_listing(subreddit, ListingKind::Hot, limit).await
    }

    /// Fetch the newest posts from a subreddit.
    pub async fn get_new_posts(
        &self,
        subreddit: &str,
        limit: u32,
    ) -> Result<Vec<Post>, RedditClientError> {
        self.fetch_listing(subreddit, ListingKind::New, limit).await
    }

    /// Fetch top posts within a time window.
    ///
    /// `time_filter` must be one of hour, day, week, month, year, all; it is
    /// checked before any request is made.
    pub async fn get_top_posts(
        &self,
        subreddit: &str,
        time_filter: &str,
        limit: u32,
    ) -> Result<Vec<Post>, RedditClientError> {
        let time_filter: TimeFilter = time_filter.parse()?;
        self.fetch_listing(subreddit, ListingKind::Top(time_filter), limit)
            .await
    }

    /// Search posts in a subreddit. No match is an empty result, not an error.
    pub async fn search_posts(
        &self,
        subreddit: &str,
        query: &str,
        sort: &str,
        time_filter: &str,
        limit: u32,
    ) -> Result<Vec<Post>, RedditClientError> {
        validate_subreddit(subreddit)?;
        let query = query.trim();
        if query.is_empty() {
            return Err(RedditClientError::invalid("query", "must not be empty"));
        }
        let sort: SearchSort = sort.parse()?;
        let time_filter: TimeFilter = time_filter.parse()?;
        validate_limit(limit)?;

        info!(
            "Searching r/{} for '{}' (sort={}, t={}, limit={})",
            subreddit, query, sort, time_filter, limit
        );
        let raw = self
            .source
            .search(subreddit, query, sort, time_filter, limit)
            .await?;
        Ok(normalize_posts(raw, limit))
    }

    /// Fetch the comments of a post as a flat list.
    ///
    /// Upstream order and `depth` values are kept, so callers can rebuild the
    /// tree if they need it. `post_id` is the bare id, without `t3_`.
    pub async fn get_post_comments(
        &self,
        post_id: &str,
        limit: Option<u32>,
    ) -> Result<Vec<Comment>, RedditClientError> {
        validate_post_id(post_id)?;
        if let Some(limit) = limit {
            validate_limit(limit)?;
        }

        info!("Fetching comments for post {}", post_id);
        let raw = self.source.comments(post_id, limit).await?;
        let cap = limit.map_or(usize::MAX, |l| l as usize);
        let comments: Vec<Comment> = raw.iter().take(cap).map(normalize_comment).collect();
        debug!("Normalized {} comments for post {}", comments.len(), post_id);
        Ok(comments)
    }

    pub async fn get_subreddit_info(
        &self,
        subreddit: &str,
    ) -> Result<SubredditInfo, RedditClientError> {
        validate_subreddit(subreddit)?;
        info!("Fetching info for r/{}", subreddit);
        let raw = self.source.subreddit_info(subreddit).await?;
        Ok(normalize_subreddit(&raw))
    }

    /// Summarize up to `limit` hot posts.
    ///
    /// A subreddit without posts yields `sample_size == 0` and zeroed averages.
    pub async fn get_subreddit_stats(
        &self,
        subreddit: &str,
        limit: u32,
    ) -> Result<SubredditStats, RedditClientError> {
        let posts = self.get_hot_posts(subreddit, limit).await?;
        let stats = summarize(subreddit, &posts, Utc::now());
        debug!(
            "Computed stats for r/{} over {} posts",
            subreddit, stats.sample_size
        );
        Ok(stats)
    }

    async fn fetch_listing(
        &self,
        subreddit: &str,
        kind: ListingKind,
        limit: u32,
    ) -> Result<Vec<Post>, RedditClientError> {
        validate_subreddit(subreddit)?;
        validate_limit(limit)?;

        info!(
            "Fetching {} {} posts from r/{}",
            limit,
            kind.path(),
            subreddit
        );
        let raw = self.source.listing(subreddit, kind, limit).await?;
        Ok(normalize_posts(raw, limit))
    }
}

fn normalize_posts(raw: Vec<Value>, limit: u32) -> Vec<Post> {
    let posts: Vec<Post> = raw
        .iter()
        .take(limit as usize)
        .map(normalize_post)
        .collect();
    debug!("Normalized {} posts", posts.len());
    posts
}

fn validate_subreddit(subreddit: &str) -> Result<(), RedditClientError> {
    let name = subreddit.trim();
    if name.is_empty() {
        return Err(RedditClientError::invalid("subreddit", "must not be empty"));
    }
    if name.starts_with("r/") || name.starts_with("/r/") {
        return Err(RedditClientError::invalid(
            "subreddit",
            format!("'{}' must be given without the r/ prefix", subreddit),
        ));
    }
    if !subreddit
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '_')
    {
        return Err(RedditClientError::invalid(
            "subreddit",
            format!(
                "'{}' is not a valid subreddit name (letters, digits and _ only)",
                subreddit
            ),
        ));
    }
    Ok(())
}

fn validate_limit(limit: u32) -> Result<(), RedditClientError> {
    if limit == 0 {
        return Err(RedditClientError::invalid("limit", "must be positive"));
    }
    Ok(())
}

fn validate_post_id(post_id: &str) -> Result<(), RedditClientError> {
    if post_id.trim().is_empty() {
        return Err(RedditClientError::invalid("post_id", "must not be empty"));
    }
    if post_id.starts_with("t3_") {
        return Err(RedditClientError::invalid(
            "post_id",
            format!("'{}' must be the bare id, without the t3_ prefix", post_id),
        ));
    }
    // Post ids are base36
    if !post_id.chars().all(|c| c.is_ascii_alphanumeric()) {
        return Err(RedditClientError::invalid(
            "post_id",
            format!("'{}' is not a valid post id", post_id),
        ));
    }
    Ok(())
}
