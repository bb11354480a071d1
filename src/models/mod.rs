use serde::{Deserialize, Serialize};

pub mod params;

pub use params::{ListingKind, SearchSort, TimeFilter};

/// Sentinel author for posts and comments whose account is gone.
pub const DELETED_AUTHOR: &str = "[deleted]";

/// Normalized Reddit post.
///
/// Every field is always present when serialized. Values missing upstream
/// are replaced by the defaults declared in the normalization table.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
pub struct Post {
    pub id: String,
    pub title: String,
    pub author: String,
    pub score: i64,
    pub upvote_ratio: f64,
    pub num_comments: u64,
    /// RFC 3339 timestamp in UTC, `None` when upstream gave no usable value
    pub created_utc: Option<String>,
    pub url: String,
    pub permalink: String,
    pub is_self: bool,
    pub selftext: String,
    pub link_flair_text: Option<String>,
    pub subreddit: String,
    pub is_over18: bool,
    pub spoiler: bool,
    pub stickied: bool,
}

/// Normalized comment, flattened out of its tree.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
pub struct Comment {
    pub id: String,
    pub author: String,
    pub body: String,
    pub score: i64,
    pub created_utc: Option<String>,
    pub permalink: String,
    pub is_submitter: bool,
    /// Fullname of the parent: `t1_*` for a reply, `t3_*` for a top-level comment
    pub parent_id: String,
    /// 0 for top-level comments
    pub depth: u64,
}

/// Normalized subreddit metadata
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
pub struct SubredditInfo {
    pub name: String,
    pub title: String,
    pub description: String,
    pub subscribers: u64,
    pub active_users: Option<u64>,
    pub created_utc: Option<String>,
    pub is_over18: bool,
    pub url: String,
}

/// Aggregate metrics over a batch of hot posts.
///
/// When `sample_size` is 0 every numeric field is 0, so callers must check
/// it before trusting the averages.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct SubredditStats {
    pub subreddit: String,
    pub sample_size: u64,
    pub total_score: i64,
    pub total_comments: u64,
    pub average_score: f64,
    pub average_comments: f64,
    pub average_upvote_ratio: f64,
    pub max_score: i64,
    pub min_score: i64,
    pub analyzed_at: String,
}

impl Post {
    /// Format a post for display with important metadata
    pub fn format_summary(&self) -> String {
        let mut content = format!(
            "Title: {}\nAuthor: u/{}\nSubreddit: r/{}\nScore: {} ({}% upvoted) | Comments: {}\n",
            self.title,
            self.author,
            self.subreddit,
            self.score,
            (self.upvote_ratio * 100.0).round() as i64,
            self.num_comments,
        );

        if let Some(created) = &self.created_utc {
            content.push_str(&format!("Created: {}\n", created));
        }

        // Add post type indicators
        let mut flags = Vec::new();
        if self.is_self {
            flags.push("Self Post");
        }
        if self.is_over18 {
            flags.push("NSFW");
        }
        if self.spoiler {
            flags.push("Spoiler");
        }
        if self.stickied {
            flags.push("Stickied");
        }
        if !flags.is_empty() {
            content.push_str(&format!("Flags: [{}]\n", flags.join(", ")));
        }

        if let Some(flair) = &self.link_flair_text {
            if !flair.is_empty() {
                content.push_str(&format!("Flair: {}\n", flair));
            }
        }

        // For text posts, include the text (truncated if long)
        if self.is_self && !self.selftext.is_empty() {
            content.push_str("\nContent:\n---------\n");
            content.push_str(&truncate_chars(&self.selftext, 500));
            content.push_str("\n---------\n");
        }

        content.push_str(&format!("\nPermalink: {}", self.permalink));
        if !self.is_self && self.url != self.permalink {
            content.push_str(&format!("\nExternal URL: {}", self.url));
        }

        content
    }

    /// Get a short summary for the post (title, author, score)
    pub fn format_short_summary(&self) -> String {
        format!(
            "[r/{} | {} pts | {} comments] {} - by u/{}",
            self.subreddit,
            self.score,
            self.num_comments,
            truncate_chars(&self.title, 60),
            self.author
        )
    }
}

impl Comment {
    /// Render the comment indented by its depth
    pub fn format_threaded(&self) -> String {
        let indent = "  ".repeat(self.depth as usize);
        let mut content = format!(
            "{}u/{}{} ({} pts) {}\n",
            indent,
            self.author,
            if self.is_submitter { " [OP]" } else { "" },
            self.score,
            self.created_utc.as_deref().unwrap_or("unknown time"),
        );
        for line in truncate_chars(&self.body, 300).lines() {
            content.push_str(&format!("{}| {}\n", indent, line));
        }
        content
    }
}

impl SubredditInfo {
    pub fn format_summary(&self) -> String {
        let mut content = format!(
            "Subreddit Information:\n  Name: r/{}\n  Title: {}\n  Subscribers: {}\n",
            self.name, self.title, self.subscribers
        );
        if let Some(active) = self.active_users {
            content.push_str(&format!("  Active Users: {}\n", active));
        }
        content.push_str(&format!(
            "  Created: {}\n  NSFW: {}\n  URL: {}\n",
            self.created_utc.as_deref().unwrap_or("unknown"),
            self.is_over18,
            self.url
        ));
        if !self.description.is_empty() {
            content.push_str(&format!("  Description: {}\n", self.description));
        }
        content
    }
}

impl SubredditStats {
    pub fn format_summary(&self) -> String {
        format!(
            "Post Statistics (based on hot posts):\n  Total Posts Analyzed: {}\n  Total Score: {}\n  \
             Total Comments: {}\n  Average Score per Post: {:.2}\n  Average Comments per Post: {:.2}\n  \
             Average Upvote Ratio: {:.2}\n  Score Range: {} to {}\n  Analysis Time: {}\n",
            self.sample_size,
            self.total_score,
            self.total_comments,
            self.average_score,
            self.average_comments,
            self.average_upvote_ratio,
            self.min_score,
            self.max_score,
            self.analyzed_at,
        )
    }
}

// Truncate to `max` characters, safely handling UTF-8
fn truncate_chars(text: &str, max: usize) -> String {
    if text.chars().count() > max {
        let mut truncated = text.chars().take(max.saturating_sub(3)).collect::<String>();
        truncated.push_str("...");
        truncated
    } else {
        text.to_string()
    }
}
