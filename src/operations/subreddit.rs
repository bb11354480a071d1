use crate::client::{RedditClient, RedditSource, DEFAULT_STATS_LIMIT};
use crate::error::RedditClientError;
use crate::models::{SubredditInfo, SubredditStats};
use log::{error, info};
use serde::Serialize;
use std::path::PathBuf;

/// Configuration options for the info and stats commands
#[derive(Debug, Clone)]
pub struct SubredditOptions {
    pub subreddit: String,
    /// Also sample hot posts and compute statistics
    pub with_stats: bool,
    /// Number of hot posts to analyze
    pub limit: u32,
    pub output: Option<PathBuf>,
}

impl Default for SubredditOptions {
    fn default() -> Self {
        Self {
            subreddit: String::new(),
            with_stats: false,
            limit: DEFAULT_STATS_LIMIT,
            output: None,
        }
    }
}

/// Shape of the saved JSON report
#[derive(Debug, Serialize)]
pub struct SubredditReport {
    pub subreddit_info: SubredditInfo,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub statistics: Option<SubredditStats>,
}

#[derive(Debug)]
pub struct SubredditResult {
    pub formatted_output: String,
    pub report: SubredditReport,
}

pub struct SubredditOperation<'a, S> {
    options: SubredditOptions,
    client: &'a RedditClient<S>,
}

impl<'a, S: RedditSource> SubredditOperation<'a, S> {
    pub fn new(options: SubredditOptions, client: &'a RedditClient<S>) -> Self {
        Self { options, client }
    }

    pub async fn execute(&self) -> Result<SubredditResult, RedditClientError> {
        let info = self
            .client
            .get_subreddit_info(&self.options.subreddit)
            .await?;

        let statistics = if self.options.with_stats {
            Some(
                self.client
                    .get_subreddit_stats(&self.options.subreddit, self.options.limit)
                    .await?,
            )
        } else {
            None
        };

        let mut output = info.format_summary();
        if let Some(stats) = &statistics {
            output.push('\n');
            if stats.sample_size == 0 {
                output.push_str("No posts available to analyze.\n");
            } else {
                output.push_str(&stats.format_summary());
            }
        }

        let report = SubredditReport {
            subreddit_info: info,
            statistics,
        };

        if let Some(path) = &self.options.output {
            super::write_json(path, &report)?;
        }

        Ok(SubredditResult {
            formatted_output: output,
            report,
        })
    }
}

/// CLI handler function for the info and stats commands
pub async fn handle_subreddit_command<S: RedditSource>(
    options: SubredditOptions,
    client: &RedditClient<S>,
) -> Result<(), RedditClientError> {
    if options.with_stats {
        info!(
            "Analyzing r/{} ({} hot posts)",
            options.subreddit, options.limit
        );
    } else {
        info!("Fetching information about r/{}", options.subreddit);
    }

    let operation = SubredditOperation::new(options, client);
    match operation.execute().await {
        Ok(result) => {
            print!("{}", result.formatted_output);
            Ok(())
        }
        Err(err) => {
            error!("Error analyzing subreddit: {}", err);
            Err(err)
        }
    }
}
