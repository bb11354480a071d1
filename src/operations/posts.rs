use crate::client::{RedditClient, RedditSource, DEFAULT_LIMIT};
use crate::error::RedditClientError;
use crate::models::Post;
use log::{error, info};
use std::path::PathBuf;

/// Which posts to fetch
#[derive(Debug, Clone, PartialEq)]
pub enum PostsQuery {
    Hot,
    New,
    Top {
        time_filter: String,
    },
    Search {
        query: String,
        sort: String,
        time_filter: String,
    },
}

/// Configuration options for fetching posts
#[derive(Debug, Clone)]
pub struct PostsOptions {
    /// The name of the subreddit to fetch posts from, without r/
    pub subreddit: String,
    pub query: PostsQuery,
    /// The number of posts to retrieve
    pub limit: u32,
    /// Display posts in a brief, one-line format
    pub brief: bool,
    /// Save the normalized posts to this JSON file
    pub output: Option<PathBuf>,
}

impl Default for PostsOptions {
    fn default() -> Self {
        Self {
            subreddit: String::new(),
            query: PostsQuery::Hot,
            limit: DEFAULT_LIMIT,
            brief: false,
            output: None,
        }
    }
}

/// Result of a posts fetch operation
#[derive(Debug)]
pub struct PostsResult {
    /// The number of posts found
    pub post_count: usize,
    /// Formatted output (for CLI display)
    pub formatted_output: String,
    pub posts: Vec<Post>,
}

/// Operation for fetching posts from Reddit
pub struct PostsOperation<'a, S> {
    options: PostsOptions,
    client: &'a RedditClient<S>,
}

impl<'a, S: RedditSource> PostsOperation<'a, S> {
    pub fn new(options: PostsOptions, client: &'a RedditClient<S>) -> Self {
        Self { options, client }
    }

    /// Execute the posts operation
    pub async fn execute(&self) -> Result<PostsResult, RedditClientError> {
        let PostsOptions {
            subreddit, limit, ..
        } = &self.options;

        let posts = match &self.options.query {
            PostsQuery::Hot => self.client.get_hot_posts(subreddit, *limit).await,
            PostsQuery::New => self.client.get_new_posts(subreddit, *limit).await,
            PostsQuery::Top { time_filter } => {
                self.client
                    .get_top_posts(subreddit, time_filter, *limit)
                    .await
            }
            PostsQuery::Search {
                query,
                sort,
                time_filter,
            } => {
                self.client
                    .search_posts(subreddit, query, sort, time_filter, *limit)
                    .await
            }
        }?;

        // Generate formatted output for display
        let mut output = String::new();
        if posts.is_empty() {
            output.push_str("No posts found.\n");
        } else {
            output.push_str(&format!("Found {} posts in r/{}\n", posts.len(), subreddit));
            if self.options.brief {
                self.format_brief_output(&posts, &mut output);
                output.push_str("\nPost Type Legend:\n");
                output.push_str("[T] = Text post\n");
                output.push_str("[L] = Link\n");
            } else {
                self.format_detailed_output(&posts, &mut output);
            }
        }

        if let Some(path) = &self.options.output {
            super::write_json(path, &posts)?;
        }

        Ok(PostsResult {
            post_count: posts.len(),
            formatted_output: output,
            posts,
        })
    }

    // Internal helper method for brief output format
    fn format_brief_output(&self, posts: &[Post], output: &mut String) {
        for (i, post) in posts.iter().enumerate() {
            let post_type = if post.is_self { "T" } else { "L" };
            // "YYYY-MM-DDTHH:MM:SSZ" -> "YYYY-MM-DD HH:MM"
            let created = post
                .created_utc
                .as_deref()
                .and_then(|ts| ts.get(..16))
                .map(|ts| ts.replacen('T', " ", 1))
                .unwrap_or_else(|| "unknown".to_string());

            output.push_str(&format!(
                "{:2}. [{}] [{}] {} | ID: t3_{} | {}\n",
                i + 1,
                post_type,
                created,
                post.format_short_summary(),
                post.id,
                post.permalink
            ));
        }
    }

    // Internal helper method for detailed output format
    fn format_detailed_output(&self, posts: &[Post], output: &mut String) {
        for post in posts {
            output.push_str("\n============ POST =============\n");
            output.push_str(&format!("ID: {} (use this to fetch comments)\n", post.id));
            output.push_str(&post.format_summary());
            output.push_str("\n================================\n\n");
        }
    }
}

/// CLI handler function for the listing and search commands
pub async fn handle_posts_command<S: RedditSource>(
    options: PostsOptions,
    client: &RedditClient<S>,
) -> Result<(), RedditClientError> {
    info!(
        "Gathering {:?} posts from r/{}",
        options.query, options.subreddit
    );

    let operation = PostsOperation::new(options, client);
    match operation.execute().await {
        Ok(result) => {
            // Print the formatted output to the console
            print!("{}", result.formatted_output);
            Ok(())
        }
        Err(err) => {
            error!("Error fetching posts: {}", err);
            Err(err)
        }
    }
}
