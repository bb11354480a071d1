//! Table-driven conversion of raw Reddit objects into stable records.
//!
//! Each record kind has a rule table listing its output fields, the upstream
//! keys each field may be read from (first present key wins) and how the
//! value is coerced. A value that is absent or of the wrong type falls back
//! to the coercion's default, so one malformed object degrades on its own
//! instead of failing the batch. Unknown upstream keys are ignored.
//!
//! Each table lists the output field name among its sources, which makes
//! normalizing an already normalized record a no-op.

use crate::models::{Comment, Post, SubredditInfo, DELETED_AUTHOR};
use chrono::{DateTime, SecondsFormat, Utc};
use log::{debug, warn};
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};

const REDDIT_ORIGIN: &str = "https://reddit.com";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Coercion {
    /// String, default `""`
    Text,
    /// String or `null`
    OptionalText,
    /// Non-empty string, default `"[deleted]"`
    Author,
    /// Signed integer, default 0
    Integer,
    /// Non-negative integer, default 0
    Count,
    /// Non-negative integer or `null`
    OptionalCount,
    /// Float within 0.0..=1.0, default 0.0
    Ratio,
    /// Boolean, default false
    Flag,
    /// Epoch seconds or RFC 3339 string rendered as RFC 3339 UTC, default `null`
    Timestamp,
    /// Reddit-relative path made absolute, default `""`
    RedditLink,
}

#[derive(Debug)]
struct FieldRule {
    target: &'static str,
    sources: &'static [&'static str],
    coercion: Coercion,
}

const fn rule(
    target: &'static str,
    sources: &'static [&'static str],
    coercion: Coercion,
) -> FieldRule {
    FieldRule {
        target,
        sources,
        coercion,
    }
}

const POST_RULES: &[FieldRule] = &[
    rule("id", &["id"], Coercion::Text),
    rule("title", &["title"], Coercion::Text),
    rule("author", &["author"], Coercion::Author),
    rule("score", &["score"], Coercion::Integer),
    rule("upvote_ratio", &["upvote_ratio"], Coercion::Ratio),
    rule("num_comments", &["num_comments"], Coercion::Count),
    rule("created_utc", &["created_utc"], Coercion::Timestamp),
    rule("url", &["url"], Coercion::Text),
    rule("permalink", &["permalink"], Coercion::RedditLink),
    rule("is_self", &["is_self"], Coercion::Flag),
    // Blanked afterwards for link posts
    rule("selftext", &["selftext"], Coercion::Text),
    rule("link_flair_text", &["link_flair_text"], Coercion::OptionalText),
    rule("subreddit", &["subreddit"], Coercion::Text),
    rule("is_over18", &["over_18", "is_over18"], Coercion::Flag),
    rule("spoiler", &["spoiler"], Coercion::Flag),
    rule("stickied", &["stickied"], Coercion::Flag),
];

const COMMENT_RULES: &[FieldRule] = &[
    rule("id", &["id"], Coercion::Text),
    rule("author", &["author"], Coercion::Author),
    rule("body", &["body"], Coercion::Text),
    rule("score", &["score"], Coercion::Integer),
    rule("created_utc", &["created_utc"], Coercion::Timestamp),
    rule("permalink", &["permalink"], Coercion::RedditLink),
    rule("is_submitter", &["is_submitter"], Coercion::Flag),
    rule("parent_id", &["parent_id"], Coercion::Text),
    rule("depth", &["depth"], Coercion::Count),
];

const SUBREDDIT_RULES: &[FieldRule] = &[
    rule("name", &["display_name", "name"], Coercion::Text),
    rule("title", &["title"], Coercion::Text),
    rule(
        "description",
        &["public_description", "description"],
        Coercion::Text,
    ),
    rule("subscribers", &["subscribers"], Coercion::Count),
    rule(
        "active_users",
        &["active_user_count", "active_users"],
        Coercion::OptionalCount,
    ),
    rule("created_utc", &["created_utc"], Coercion::Timestamp),
    rule("is_over18", &["over18", "is_over18"], Coercion::Flag),
    rule("url", &["url"], Coercion::RedditLink),
];

/// Normalize a raw post (`t3`) object.
pub fn normalize_post(raw: &Value) -> Post {
    let mut fields = apply_rules(raw, POST_RULES);
    if fields.get("is_self") != Some(&Value::Bool(true)) {
        fields.insert("selftext".to_string(), Value::String(String::new()));
    }
    into_record(fields, POST_RULES, "post")
}

/// Normalize a raw comment (`t1`) object.
pub fn normalize_comment(raw: &Value) -> Comment {
    into_record(apply_rules(raw, COMMENT_RULES), COMMENT_RULES, "comment")
}

/// Normalize a raw subreddit (`t5`) object.
pub fn normalize_subreddit(raw: &Value) -> SubredditInfo {
    into_record(apply_rules(raw, SUBREDDIT_RULES), SUBREDDIT_RULES, "subreddit")
}

/// Render epoch seconds as an RFC 3339 UTC timestamp, e.g. `2022-01-01T00:00:00Z`.
///
/// Fractional seconds are dropped. Returns `None` for non-finite or
/// out-of-range input.
pub fn epoch_to_rfc3339(seconds: f64) -> Option<String> {
    if !seconds.is_finite() {
        return None;
    }
    DateTime::<Utc>::from_timestamp(seconds.floor() as i64, 0)
        .map(|dt| dt.to_rfc3339_opts(SecondsFormat::Secs, true))
}

// Listing children arrive as {"kind": "t3", "data": {...}}; accept either form
fn thing_data(raw: &Value) -> Option<&Map<String, Value>> {
    let object = raw.as_object()?;
    match (object.get("kind"), object.get("data")) {
        (Some(Value::String(_)), Some(Value::Object(data))) => Some(data),
        _ => Some(object),
    }
}

fn apply_rules(raw: &Value, rules: &[FieldRule]) -> Map<String, Value> {
    let empty = Map::new();
    let source = thing_data(raw).unwrap_or_else(|| {
        warn!("Expected a JSON object to normalize, got: {}", type_name(raw));
        &empty
    });

    rules
        .iter()
        .map(|rule| {
            let upstream = rule
                .sources
                .iter()
                .find_map(|key| source.get(*key).filter(|value| !value.is_null()));
            let value = match upstream {
                Some(value) => coerce(value, rule.coercion).unwrap_or_else(|| {
                    debug!(
                        "Field '{}' has unexpected {} value, using default",
                        rule.target,
                        type_name(value)
                    );
                    default_for(rule.coercion)
                }),
                None => default_for(rule.coercion),
            };
            (rule.target.to_string(), value)
        })
        .collect()
}

// Falls back to the per-rule defaults so sentinels such as the deleted author survive
fn into_record<T: DeserializeOwned + Default>(
    fields: Map<String, Value>,
    rules: &[FieldRule],
    kind: &str,
) -> T {
    serde_json::from_value(Value::Object(fields)).unwrap_or_else(|e| {
        warn!("Normalized {} did not match its record shape: {}", kind, e);
        let defaults: Map<String, Value> = rules
            .iter()
            .map(|rule| (rule.target.to_string(), default_for(rule.coercion)))
            .collect();
        serde_json::from_value(Value::Object(defaults)).unwrap_or_default()
    })
}

fn default_for(coercion: Coercion) -> Value {
    match coercion {
        Coercion::Text | Coercion::RedditLink => Value::String(String::new()),
        Coercion::Author => Value::String(DELETED_AUTHOR.to_string()),
        Coercion::OptionalText | Coercion::OptionalCount | Coercion::Timestamp => Value::Null,
        Coercion::Integer | Coercion::Count => Value::from(0),
        Coercion::Ratio => Value::from(0.0),
        Coercion::Flag => Value::Bool(false),
    }
}

// None means the value is present but unusable
fn coerce(value: &Value, coercion: Coercion) -> Option<Value> {
    match coercion {
        Coercion::Text | Coercion::OptionalText => value.as_str().map(Value::from),
        Coercion::Author => value
            .as_str()
            .map(str::trim)
            .filter(|name| !name.is_empty())
            .map(Value::from),
        Coercion::Integer => integer(value).map(Value::from),
        Coercion::Count | Coercion::OptionalCount => integer(value)
            .and_then(|n| u64::try_from(n).ok())
            .map(Value::from),
        Coercion::Ratio => value
            .as_f64()
            .filter(|ratio| (0.0..=1.0).contains(ratio))
            .map(Value::from),
        Coercion::Flag => value.as_bool().map(Value::Bool),
        Coercion::Timestamp => timestamp(value).map(Value::String),
        Coercion::RedditLink => value.as_str().map(|link| Value::String(absolute_link(link))),
    }
}

fn integer(value: &Value) -> Option<i64> {
    value.as_i64().or_else(|| {
        value
            .as_f64()
            .filter(|n| n.is_finite() && n.fract() == 0.0)
            .map(|n| n as i64)
    })
}

fn timestamp(value: &Value) -> Option<String> {
    match value {
        Value::Number(n) => n.as_f64().and_then(epoch_to_rfc3339),
        Value::String(s) => DateTime::parse_from_rfc3339(s)
            .ok()
            .map(|dt| dt.with_timezone(&Utc).to_rfc3339_opts(SecondsFormat::Secs, true)),
        _ => None,
    }
}

fn absolute_link(link: &str) -> String {
    if link.is_empty() || link.starts_with("http://") || link.starts_with("https://") {
        link.to_string()
    } else if link.starts_with('/') {
        format!("{}{}", REDDIT_ORIGIN, link)
    } else {
        format!("{}/{}", REDDIT_ORIGIN, link)
    }
}

fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
