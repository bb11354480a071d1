//! [`RedditSource`] backed by Reddit's OAuth JSON API.
//!
//! The session holds a single access token obtained at construction time.
//! Tokens are not refreshed and requests are not retried; throttling is
//! reported as [`RedditClientError::RateLimit`] straight away.

use super::RedditSource;
use crate::config::AppConfig;
use crate::error::RedditClientError;
use crate::models::{ListingKind, SearchSort, TimeFilter};
use async_trait::async_trait;
use log::{debug, warn};
use reqwest::header::HeaderMap;
use reqwest::redirect::Policy;
use reqwest::{Client, Response, StatusCode};
use serde_json::{Map, Value};
use url::Url;

pub const AUTH_BASE_URL: &str = "https://www.reddit.com";
pub const API_BASE_URL: &str = "https://oauth.reddit.com";

/// An authenticated connection to the Reddit API
pub struct HttpSession {
    client: Client,
    api_base: Url,
    access_token: String,
}

impl HttpSession {
    /// Exchange the configured credentials for an access token.
    ///
    /// Uses the password grant when a username and password are configured,
    /// otherwise an application-only token.
    pub async fn authenticate(config: &AppConfig) -> Result<Self, RedditClientError> {
        Self::authenticate_with_base_urls(config, AUTH_BASE_URL, API_BASE_URL).await
    }

    /// Same as [`HttpSession::authenticate`] against custom hosts (for testing with wiremock).
    pub async fn authenticate_with_base_urls(
        config: &AppConfig,
        auth_base: &str,
        api_base: &str,
    ) -> Result<Self, RedditClientError> {
        // Unknown subreddits redirect to the search page; surface that as a status instead
        let client = Client::builder()
            .user_agent(config.user_agent())
            .redirect(Policy::none())
            .build()?;

        let auth_base = parse_base_url(auth_base)?;
        let api_base = parse_base_url(api_base)?;
        let access_token = request_token(&client, &auth_base, config).await?;

        Ok(Self {
            client,
            api_base,
            access_token,
        })
    }

    async fn get_json(
        &self,
        path: &str,
        params: &[(&str, String)],
    ) -> Result<Value, RedditClientError> {
        let url = self.api_base.join(path).map_err(|e| {
            RedditClientError::invalid("path", format!("cannot build URL for '{}': {}", path, e))
        })?;
        debug!("Fetching {} with {:?}", url, params);

        let response = self
            .client
            .get(url)
            .bearer_auth(&self.access_token)
            .query(params)
            .query(&[("raw_json", "1")])
            .send()
            .await?;

        let response = check_status(response, path).await?;
        let body: Value = response.json().await?;
        Ok(body)
    }
}

#[async_trait]
impl RedditSource for HttpSession {
    async fn listing(
        &self,
        subreddit: &str,
        kind: ListingKind,
        limit: u32,
    ) -> Result<Vec<Value>, RedditClientError> {
        let mut params = vec![("limit", limit.to_string())];
        if let Some(time_filter) = kind.time_filter() {
            params.push(("t", time_filter.to_string()));
        }

        let body = self
            .get_json(&format!("r/{}/{}", subreddit, kind.path()), &params)
            .await?;
        listing_things(&body, "t3")
    }

    async fn search(
        &self,
        subreddit: &str,
        query: &str,
        sort: SearchSort,
        time_filter: TimeFilter,
        limit: u32,
    ) -> Result<Vec<Value>, RedditClientError> {
        let params = vec![
            ("q", query.to_string()),
            ("sort", sort.to_string()),
            ("t", time_filter.to_string()),
            ("restrict_sr", "on".to_string()),
            ("limit", limit.to_string()),
        ];

        let body = self
            .get_json(&format!("r/{}/search", subreddit), &params)
            .await?;
        listing_things(&body, "t3")
    }

    async fn comments(
        &self,
        post_id: &str,
        limit: Option<u32>,
    ) -> Result<Vec<Value>, RedditClientError> {
        let params: Vec<(&str, String)> = limit
            .map(|l| vec![("limit", l.to_string())])
            .unwrap_or_default();

        let body = self
            .get_json(&format!("comments/{}", post_id), &params)
            .await?;

        // The response is [post listing, comment listing]
        let children = body
            .get(1)
            .and_then(|listing| listing.pointer("/data/children"))
            .and_then(Value::as_array)
            .ok_or_else(|| {
                RedditClientError::Transport(format!(
                    "unexpected comments payload for post {}",
                    post_id
                ))
            })?;

        let cap = limit.map_or(usize::MAX, |l| l as usize);
        let mut flattened = Vec::new();
        flatten_comments(children, 0, cap, &mut flattened);
        debug!("Flattened {} comments for post {}", flattened.len(), post_id);
        Ok(flattened)
    }

    async fn subreddit_info(&self, subreddit: &str) -> Result<Value, RedditClientError> {
        let body = self
            .get_json(&format!("r/{}/about", subreddit), &[])
            .await?;

        match (body.get("kind").and_then(Value::as_str), body.get("data")) {
            (Some("t5"), Some(data)) => Ok(data.clone()),
            _ => Err(RedditClientError::NotFound(format!(
                "r/{} does not exist or is not accessible",
                subreddit
            ))),
        }
    }
}

async fn request_token(
    client: &Client,
    auth_base: &Url,
    config: &AppConfig,
) -> Result<String, RedditClientError> {
    let mut params = Vec::with_capacity(3);
    match (config.username(), config.password()) {
        (Some(username), Some(password)) => {
            params.push(("grant_type", "password"));
            params.push(("username", username));
            params.push(("password", password));
        }
        _ => params.push(("grant_type", "client_credentials")),
    }

    let auth = base64::encode(format!(
        "{}:{}",
        config.client_id(),
        config.client_secret()
    ));
    let url = auth_base
        .join("api/v1/access_token")
        .map_err(|e| RedditClientError::invalid("auth_base", e.to_string()))?;

    let res = client
        .post(url)
        .header("Authorization", format!("Basic {}", auth))
        .form(&params)
        .send()
        .await?;

    let status = res.status();
    if status == StatusCode::TOO_MANY_REQUESTS {
        return Err(rate_limit_error(res.headers(), "token request"));
    }
    if !status.is_success() {
        let body = res.text().await.unwrap_or_default();
        return Err(RedditClientError::Auth(format!("HTTP {}: {}", status, body)));
    }

    let json: Value = res.json().await?;

    // Reddit reports bad credentials as 200 with an error field
    if let Some(error) = json.get("error") {
        return Err(RedditClientError::Auth(error.to_string()));
    }

    let token = json
        .get("access_token")
        .and_then(Value::as_str)
        .ok_or_else(|| {
            RedditClientError::Auth("Failed to extract access token from response".to_string())
        })?
        .to_string();

    debug!(
        "Access token obtained with scopes: {:?}",
        json.get("scope").and_then(Value::as_str)
    );
    Ok(token)
}

/// Translate a non-success response into the matching error kind.
async fn check_status(response: Response, context: &str) -> Result<Response, RedditClientError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    warn!("Request to {} failed with status {}", context, status);

    match status {
        StatusCode::UNAUTHORIZED => Err(RedditClientError::Auth(format!(
            "{} rejected the access token",
            context
        ))),
        StatusCode::TOO_MANY_REQUESTS => Err(rate_limit_error(response.headers(), context)),
        StatusCode::FORBIDDEN | StatusCode::NOT_FOUND => {
            let body: Value = response.json().await.unwrap_or(Value::Null);
            let reason = body
                .get("reason")
                .and_then(Value::as_str)
                .unwrap_or("not found");
            Err(RedditClientError::NotFound(format!("{} ({})", context, reason)))
        }
        s if s.is_redirection() => Err(RedditClientError::NotFound(format!(
            "{} (redirected to {})",
            context,
            response
                .headers()
                .get("location")
                .and_then(|v| v.to_str().ok())
                .unwrap_or("an unknown location")
        ))),
        s => {
            let body = response.text().await.unwrap_or_default();
            Err(RedditClientError::Transport(format!(
                "{} returned HTTP {}: {}",
                context, s, body
            )))
        }
    }
}

fn rate_limit_error(headers: &HeaderMap, context: &str) -> RedditClientError {
    let retry_after = ["retry-after", "x-ratelimit-reset"]
        .iter()
        .find_map(|name| headers.get(*name))
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.trim().parse::<f64>().ok())
        .filter(|seconds| seconds.is_finite() && *seconds >= 0.0)
        .map(|seconds| seconds.ceil() as u64);

    RedditClientError::RateLimit {
        message: format!("{} was throttled by Reddit", context),
        retry_after,
    }
}

/// Data objects of the listing children whose kind matches.
fn listing_things(body: &Value, kind: &str) -> Result<Vec<Value>, RedditClientError> {
    let children = body
        .pointer("/data/children")
        .and_then(Value::as_array)
        .ok_or_else(|| RedditClientError::Transport("response is not a listing".to_string()))?;

    Ok(children
        .iter()
        .filter(|child| child.get("kind").and_then(Value::as_str) == Some(kind))
        .filter_map(|child| child.get("data").cloned())
        .collect())
}

/// Depth-first walk of a comment tree, skipping `more` placeholders.
fn flatten_comments(children: &[Value], depth: u64, cap: usize, out: &mut Vec<Value>) {
    for child in children {
        if out.len() >= cap {
            return;
        }
        if child.get("kind").and_then(Value::as_str) != Some("t1") {
            continue;
        }
        let Some(data) = child.get("data").and_then(Value::as_object) else {
            continue;
        };

        let mut comment: Map<String, Value> = data.clone();
        let replies = comment.remove("replies");
        let own_depth = comment
            .get("depth")
            .and_then(Value::as_u64)
            .unwrap_or(depth);
        comment.insert("depth".to_string(), Value::from(own_depth));
        out.push(Value::Object(comment));

        // Leaf comments carry an empty string instead of a listing
        if let Some(nested) = replies
            .as_ref()
            .and_then(|r| r.pointer("/data/children"))
            .and_then(Value::as_array)
        {
            flatten_comments(nested, own_depth + 1, cap, out);
        }
    }
}

fn parse_base_url(base_url: &str) -> Result<Url, RedditClientError> {
    // A trailing slash makes join() append to the path instead of replacing it
    let normalised = format!("{}/", base_url.trim_end_matches('/'));
    Url::parse(&normalised).map_err(|e| {
        RedditClientError::invalid("base_url", format!("'{}' is not a valid URL: {}", base_url, e))
    })
}
