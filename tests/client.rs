//! Integration tests for `RedditClient` against an in-memory source.

use async_trait::async_trait;
use redreader::models::{ListingKind, SearchSort, TimeFilter, DELETED_AUTHOR};
use redreader::{RedditClient, RedditClientError, RedditSource};
use serde_json::{json, Value};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

#[derive(Debug, Clone, PartialEq)]
enum Call {
    Listing(String, ListingKind, u32),
    Search(String, String, SearchSort, TimeFilter, u32),
    Comments(String, Option<u32>),
    Info(String),
}

#[derive(Default)]
struct FakeSource {
    posts: Vec<Value>,
    comments: Vec<Value>,
    info: Option<Value>,
    failure: Option<fn() -> RedditClientError>,
    call_count: AtomicUsize,
    requests: Mutex<Vec<Call>>,
}

impl FakeSource {
    fn with_posts(posts: Vec<Value>) -> Self {
        Self {
            posts,
            ..Self::default()
        }
    }

    fn record(&self, call: Call) -> Result<(), RedditClientError> {
        self.call_count.fetch_add(1, Ordering::SeqCst);
        self.requests.lock().unwrap().push(call);
        match self.failure {
            Some(make_error) => Err(make_error()),
            None => Ok(()),
        }
    }

    fn calls(&self) -> usize {
        self.call_count.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl RedditSource for FakeSource {
    async fn listing(
        &self,
        subreddit: &str,
        kind: ListingKind,
        limit: u32,
    ) -> Result<Vec<Value>, RedditClientError> {
        self.record(Call::Listing(subreddit.to_string(), kind, limit))?;
        Ok(self.posts.clone())
    }

    async fn search(
        &self,
        subreddit: &str,
        query: &str,
        sort: SearchSort,
        time_filter: TimeFilter,
        limit: u32,
    ) -> Result<Vec<Value>, RedditClientError> {
        self.record(Call::Search(
            subreddit.to_string(),
            query.to_string(),
            sort,
            time_filter,
            limit,
        ))?;
        Ok(self.posts.clone())
    }

    async fn comments(
        &self,
        post_id: &str,
        limit: Option<u32>,
    ) -> Result<Vec<Value>, RedditClientError> {
        self.record(Call::Comments(post_id.to_string(), limit))?;
        Ok(self.comments.clone())
    }

    async fn subreddit_info(&self, subreddit: &str) -> Result<Value, RedditClientError> {
        self.record(Call::Info(subreddit.to_string()))?;
        self.info
            .clone()
            .ok_or_else(|| RedditClientError::NotFound(format!("r/{}", subreddit)))
    }
}

fn raw_post(id: &str, score: i64, num_comments: u64) -> Value {
    json!({
        "kind": "t3",
        "data": {
            "id": id,
            "title": format!("Post {}", id),
            "author": "poster",
            "score": score,
            "upvote_ratio": 0.9,
            "num_comments": num_comments,
            "created_utc": 1700000000.0,
            "url": format!("https://example.com/{}", id),
            "permalink": format!("/r/rust/comments/{}/post/", id),
            "is_self": false,
            "subreddit": "rust",
            "over_18": false,
            "spoiler": false,
            "stickied": false
        }
    })
}

fn raw_comment(id: &str, parent: &str, depth: u64) -> Value {
    json!({
        "id": id,
        "author": "commenter",
        "body": format!("comment {}", id),
        "score": 1,
        "created_utc": 1700000100,
        "permalink": format!("/r/rust/comments/abc/post/{}/", id),
        "is_submitter": false,
        "parent_id": parent,
        "depth": depth
    })
}

fn assert_invalid(err: RedditClientError, expected_name: &str) {
    match err {
        RedditClientError::InvalidParameter { name, .. } => assert_eq!(name, expected_name),
        other => panic!("expected InvalidParameter for {}, got {:?}", expected_name, other),
    }
}

#[tokio::test]
async fn hot_posts_are_normalized_in_upstream_order() {
    let client = RedditClient::new(FakeSource::with_posts(vec![
        raw_post("b", 5, 1),
        raw_post("a", 50, 2),
    ]));

    let posts = client.get_hot_posts("rust", 10).await.unwrap();

    let ids: Vec<&str> = posts.iter().map(|p| p.id.as_str()).collect();
    assert_eq!(ids, vec!["b", "a"]);
    assert_eq!(posts[0].permalink, "https://reddit.com/r/rust/comments/b/post/");
    assert_eq!(posts[0].created_utc.as_deref(), Some("2023-11-14T22:13:20Z"));
    assert_eq!(
        *client.source().requests.lock().unwrap(),
        vec![Call::Listing("rust".to_string(), ListingKind::Hot, 10)]
    );
}

#[tokio::test]
async fn listings_are_capped_at_the_requested_limit() {
    let client = RedditClient::new(FakeSource::with_posts(vec![
        raw_post("1", 1, 0),
        raw_post("2", 2, 0),
        raw_post("3", 3, 0),
    ]));

    let posts = client.get_new_posts("rust", 2).await.unwrap();
    assert_eq!(posts.len(), 2);
    assert_eq!(posts[1].id, "2");
}

#[tokio::test]
async fn top_posts_forward_the_time_filter() {
    let client = RedditClient::new(FakeSource::with_posts(vec![raw_post("t", 9, 0)]));

    client.get_top_posts("rust", "week", 5).await.unwrap();

    assert_eq!(
        *client.source().requests.lock().unwrap(),
        vec![Call::Listing(
            "rust".to_string(),
            ListingKind::Top(TimeFilter::Week),
            5
        )]
    );
}

#[tokio::test]
async fn invalid_time_filter_fails_before_any_request() {
    let client = RedditClient::new(FakeSource::with_posts(vec![raw_post("t", 9, 0)]));

    let err = client.get_top_posts("rust", "decade", 10).await.unwrap_err();

    assert_invalid(err, "time_filter");
    assert_eq!(client.source().calls(), 0);
}

#[tokio::test]
async fn structural_violations_fail_before_any_request() {
    let client = RedditClient::new(FakeSource::default());

    assert_invalid(client.get_hot_posts("", 10).await.unwrap_err(), "subreddit");
    assert_invalid(client.get_hot_posts("r/rust", 10).await.unwrap_err(), "subreddit");
    assert_invalid(client.get_new_posts("rust", 0).await.unwrap_err(), "limit");
    assert_invalid(
        client
            .search_posts("rust", "   ", "relevance", "all", 10)
            .await
            .unwrap_err(),
        "query",
    );
    assert_invalid(
        client
            .search_posts("rust", "tokio", "controversial", "all", 10)
            .await
            .unwrap_err(),
        "sort",
    );
    assert_invalid(
        client
            .search_posts("rust", "tokio", "new", "fortnight", 10)
            .await
            .unwrap_err(),
        "time_filter",
    );
    assert_invalid(
        client.get_post_comments("t3_abc", None).await.unwrap_err(),
        "post_id",
    );
    assert_invalid(
        client.get_post_comments("abc", Some(0)).await.unwrap_err(),
        "limit",
    );
    assert_invalid(client.get_subreddit_info(" ").await.unwrap_err(), "subreddit");
    assert_invalid(client.get_hot_posts("..", 5).await.unwrap_err(), "subreddit");
    assert_invalid(client.get_new_posts("rust#", 5).await.unwrap_err(), "subreddit");
    assert_invalid(
        client.get_top_posts("rust?x", "day", 5).await.unwrap_err(),
        "subreddit",
    );
    assert_invalid(client.get_subreddit_stats(".", 5).await.unwrap_err(), "subreddit");
    assert_invalid(
        client.get_post_comments("..", None).await.unwrap_err(),
        "post_id",
    );

    assert_eq!(client.source().calls(), 0);
}

#[tokio::test]
async fn search_with_no_matches_is_empty() {
    let client = RedditClient::new(FakeSource::default());

    let posts = client
        .search_posts("rust", "  borrow checker  ", "top", "year", 20)
        .await
        .unwrap();

    assert!(posts.is_empty());
    assert_eq!(
        *client.source().requests.lock().unwrap(),
        vec![Call::Search(
            "rust".to_string(),
            "borrow checker".to_string(),
            SearchSort::Top,
            TimeFilter::Year,
            20
        )]
    );
}

#[tokio::test]
async fn stats_over_empty_batch_are_zeroed() {
    let client = RedditClient::new(FakeSource::default());

    let stats = client.get_subreddit_stats("quiet", 100).await.unwrap();

    assert_eq!(stats.sample_size, 0);
    assert_eq!(stats.average_score, 0.0);
    assert_eq!(stats.average_comments, 0.0);
    assert_eq!(stats.total_score, 0);
}

#[tokio::test]
async fn stats_summarize_hot_posts() {
    let client = RedditClient::new(FakeSource::with_posts(vec![
        raw_post("a", 10, 4),
        raw_post("b", 20, 5),
        raw_post("c", 30, 6),
    ]));

    let stats = client.get_subreddit_stats("rust", 100).await.unwrap();

    assert_eq!(stats.subreddit, "rust");
    assert_eq!(stats.sample_size, 3);
    assert_eq!(stats.average_score, 20.0);
    assert_eq!(stats.total_score, 60);
    assert_eq!(stats.max_score, 30);
    assert_eq!(stats.min_score, 10);
    assert_eq!(stats.total_comments, 15);
    assert_eq!(stats.average_comments, 5.0);
    assert_eq!(
        *client.source().requests.lock().unwrap(),
        vec![Call::Listing("rust".to_string(), ListingKind::Hot, 100)]
    );
}

#[tokio::test]
async fn comments_keep_order_and_depth() {
    let source = FakeSource {
        comments: vec![
            raw_comment("c1", "t3_abc", 0),
            raw_comment("c1a", "t1_c1", 1),
            raw_comment("c1a1", "t1_c1a", 2),
            raw_comment("c2", "t3_abc", 0),
            raw_comment("c2a", "t1_c2", 1),
        ],
        ..FakeSource::default()
    };
    let client = RedditClient::new(source);

    let comments = client.get_post_comments("abc", None).await.unwrap();

    let flattened: Vec<(&str, u64)> = comments
        .iter()
        .map(|c| (c.id.as_str(), c.depth))
        .collect();
    assert_eq!(
        flattened,
        vec![("c1", 0), ("c1a", 1), ("c1a1", 2), ("c2", 0), ("c2a", 1)]
    );
    assert_eq!(comments[2].parent_id, "t1_c1a");
}

#[tokio::test]
async fn comment_limit_truncates_after_flattening() {
    let source = FakeSource {
        comments: vec![
            raw_comment("c1", "t3_abc", 0),
            raw_comment("c1a", "t1_c1", 1),
            raw_comment("c2", "t3_abc", 0),
        ],
        ..FakeSource::default()
    };
    let client = RedditClient::new(source);

    let comments = client.get_post_comments("abc", Some(2)).await.unwrap();

    assert_eq!(comments.len(), 2);
    assert_eq!(comments[1].id, "c1a");
    assert_eq!(
        *client.source().requests.lock().unwrap(),
        vec![Call::Comments("abc".to_string(), Some(2))]
    );
}

#[tokio::test]
async fn malformed_record_degrades_without_failing_batch() {
    let client = RedditClient::new(FakeSource::with_posts(vec![
        raw_post("good", 12, 3),
        json!("not an object"),
        json!({ "id": "partial", "score": "n/a" }),
    ]));

    let posts = client.get_hot_posts("rust", 10).await.unwrap();

    assert_eq!(posts.len(), 3);
    assert_eq!(posts[0].score, 12);
    assert_eq!(posts[1].id, "");
    assert_eq!(posts[1].author, DELETED_AUTHOR);
    assert_eq!(posts[2].id, "partial");
    assert_eq!(posts[2].score, 0);
}

#[tokio::test]
async fn subreddit_info_is_normalized() {
    let source = FakeSource {
        info: Some(json!({
            "display_name": "rust",
            "title": "The Rust Programming Language",
            "public_description": "A place for all things Rust",
            "subscribers": 321000,
            "active_user_count": null,
            "created_utc": 1291075200.0,
            "over18": false,
            "url": "/r/rust/"
        })),
        ..FakeSource::default()
    };
    let client = RedditClient::new(source);

    let info = client.get_subreddit_info("rust").await.unwrap();

    assert_eq!(info.name, "rust");
    assert_eq!(info.subscribers, 321000);
    assert_eq!(info.active_users, None);
    assert_eq!(info.created_utc.as_deref(), Some("2010-11-30T00:00:00Z"));
    assert_eq!(info.url, "https://reddit.com/r/rust/");
}

#[tokio::test]
async fn missing_subreddit_is_not_found() {
    let client = RedditClient::new(FakeSource::default());

    let err = client.get_subreddit_info("doesnotexist").await.unwrap_err();

    assert!(matches!(err, RedditClientError::NotFound(_)));
}

fn throttled() -> RedditClientError {
    RedditClientError::RateLimit {
        message: "slow down".to_string(),
        retry_after: Some(30),
    }
}

#[tokio::test]
async fn source_errors_are_returned_unchanged() {
    let source = FakeSource {
        posts: vec![raw_post("a", 1, 0)],
        failure: Some(throttled as fn() -> RedditClientError),
        ..FakeSource::default()
    };
    let client = RedditClient::new(source);

    let err = client.get_subreddit_stats("rust", 10).await.unwrap_err();

    match err {
        RedditClientError::RateLimit {
            message,
            retry_after,
        } => {
            assert_eq!(message, "slow down");
            assert_eq!(retry_after, Some(30));
        }
        other => panic!("unexpected error: {:?}", other),
    }
    // No retry
    assert_eq!(client.source().calls(), 1);
}
