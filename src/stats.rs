use crate::models::{Post, SubredditStats};
use chrono::{DateTime, SecondsFormat, Utc};

/// Reduce a batch of normalized posts to summary metrics.
///
/// An empty batch yields `sample_size == 0` with every numeric field set to 0.
pub fn summarize(subreddit: &str, posts: &[Post], analyzed_at: DateTime<Utc>) -> SubredditStats {
    let analyzed_at = analyzed_at.to_rfc3339_opts(SecondsFormat::Secs, true);
    let sample_size = posts.len() as u64;

    if posts.is_empty() {
        return SubredditStats {
            subreddit: subreddit.to_string(),
            sample_size: 0,
            total_score: 0,
            total_comments: 0,
            average_score: 0.0,
            average_comments: 0.0,
            average_upvote_ratio: 0.0,
            max_score: 0,
            min_score: 0,
            analyzed_at,
        };
    }

    // Wide accumulators: upstream scores are arbitrary i64 values
    let score_sum: i128 = posts.iter().map(|p| i128::from(p.score)).sum();
    let comment_sum: u128 = posts.iter().map(|p| u128::from(p.num_comments)).sum();
    let total_ratio: f64 = posts.iter().map(|p| p.upvote_ratio).sum();
    let max_score = posts.iter().map(|p| p.score).max().unwrap_or(0);
    let min_score = posts.iter().map(|p| p.score).min().unwrap_or(0);
    let count = sample_size as f64;

    SubredditStats {
        subreddit: subreddit.to_string(),
        sample_size,
        total_score: clamp_to_i64(score_sum),
        total_comments: u64::try_from(comment_sum).unwrap_or(u64::MAX),
        average_score: score_sum as f64 / count,
        average_comments: comment_sum as f64 / count,
        average_upvote_ratio: total_ratio / count,
        max_score,
        min_score,
        analyzed_at,
    }
}

fn clamp_to_i64(value: i128) -> i64 {
    i64::try_from(value).unwrap_or(if value < 0 { i64::MIN } else { i64::MAX })
}
