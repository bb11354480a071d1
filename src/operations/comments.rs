use crate::client::{RedditClient, RedditSource};
use crate::error::RedditClientError;
use crate::models::Comment;
use log::{error, info};
use std::path::PathBuf;

/// Configuration options for fetching the comments of a post
#[derive(Debug, Clone)]
pub struct CommentsOptions {
    /// Bare post id, e.g. "1abcde" rather than "t3_1abcde"
    pub post_id: String,
    /// Maximum number of comments, None for everything Reddit returns
    pub limit: Option<u32>,
    pub output: Option<PathBuf>,
}

#[derive(Debug)]
pub struct CommentsResult {
    pub comment_count: usize,
    pub formatted_output: String,
    pub comments: Vec<Comment>,
}

pub struct CommentsOperation<'a, S> {
    options: CommentsOptions,
    client: &'a RedditClient<S>,
}

impl<'a, S: RedditSource> CommentsOperation<'a, S> {
    pub fn new(options: CommentsOptions, client: &'a RedditClient<S>) -> Self {
        Self { options, client }
    }

    pub async fn execute(&self) -> Result<CommentsResult, RedditClientError> {
        let comments = self
            .client
            .get_post_comments(&self.options.post_id, self.options.limit)
            .await?;

        let mut output = String::new();
        if comments.is_empty() {
            output.push_str("No comments found.\n");
        } else {
            output.push_str(&format!(
                "Found {} comments on post {}\n\n",
                comments.len(),
                self.options.post_id
            ));
            for comment in &comments {
                output.push_str(&comment.format_threaded());
            }
        }

        if let Some(path) = &self.options.output {
            super::write_json(path, &comments)?;
        }

        Ok(CommentsResult {
            comment_count: comments.len(),
            formatted_output: output,
            comments,
        })
    }
}

/// CLI handler function for comments command
pub async fn handle_comments_command<S: RedditSource>(
    options: CommentsOptions,
    client: &RedditClient<S>,
) -> Result<(), RedditClientError> {
    info!("Fetching comments for post {}", options.post_id);

    let operation = CommentsOperation::new(options, client);
    match operation.execute().await {
        Ok(result) => {
            print!("{}", result.formatted_output);
            Ok(())
        }
        Err(err) => {
            error!("Error fetching comments: {}", err);
            Err(err)
        }
    }
}
