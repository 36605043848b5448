//! Parser for the flat timeline response shape:
//! `{"tweets": [{id, text, created_at, likes, retweets, replies}]}`.

use chrono::{DateTime, Utc};
use serde::Deserialize;
use serde_json::Value;

use crate::types::{PostMetrics, RawPost};

#[derive(Debug, Deserialize)]
pub(crate) struct FlatTimeline {
    #[serde(default)]
    pub tweets: Vec<FlatTweet>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct FlatTweet {
    // Upstream sends the id as either a number or a string.
    pub id: Option<Value>,
    pub text: Option<String>,
    pub created_at: Option<String>,
    #[serde(default)]
    pub likes: u32,
    #[serde(default)]
    pub retweets: u32,
    #[serde(default)]
    pub replies: u32,
}

/// Convert a flat timeline into raw posts, skipping malformed items.
///
/// An item without an id or without non-empty text is dropped with a debug
/// log; it never fails the batch.
pub(crate) fn parse_flat_timeline(timeline: FlatTimeline) -> Vec<RawPost> {
    timeline
        .tweets
        .into_iter()
        .filter_map(|tweet| {
            let id = tweet.id.as_ref().and_then(id_to_string)?;
            let content = match tweet.text {
                Some(text) if !text.is_empty() => text,
                _ => {
                    tracing::debug!(post_id = %id, "skipping item without text");
                    return None;
                }
            };
            Some(RawPost {
                platform_post_id: id,
                content,
                posted_at: tweet.created_at.as_deref().and_then(parse_timestamp),
                metrics: PostMetrics {
                    likes: tweet.likes,
                    retweets: tweet.retweets,
                    replies: tweet.replies,
                },
            })
        })
        .collect()
}

/// Normalise a JSON id (number or string) into its string form.
pub(crate) fn id_to_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// Parse an RFC 3339 timestamp, returning `None` on anything unparseable.
pub(crate) fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(raw)
        .ok()
        .map(|dt| dt.with_timezone(&Utc))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn timeline(value: serde_json::Value) -> FlatTimeline {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn parses_complete_tweet() {
        let posts = parse_flat_timeline(timeline(json!({
            "tweets": [{
                "id": "1234567890",
                "text": "Test tweet content about monetary policy",
                "created_at": "2025-06-07T10:00:00Z",
                "likes": 100,
                "retweets": 50,
                "replies": 25
            }]
        })));

        assert_eq!(posts.len(), 1);
        assert_eq!(posts[0].platform_post_id, "1234567890");
        assert_eq!(posts[0].metrics.likes, 100);
        assert!(posts[0].posted_at.is_some());
    }

    #[test]
    fn numeric_id_is_stringified() {
        let posts = parse_flat_timeline(timeline(json!({
            "tweets": [{ "id": 42, "text": "hello" }]
        })));
        assert_eq!(posts[0].platform_post_id, "42");
        assert_eq!(posts[0].metrics, PostMetrics::default());
    }

    #[test]
    fn items_missing_id_or_text_are_skipped() {
        let posts = parse_flat_timeline(timeline(json!({
            "tweets": [
                { "text": "no id" },
                { "id": "1" },
                { "id": "2", "text": "" },
                { "id": "3", "text": "kept" }
            ]
        })));
        assert_eq!(posts.len(), 1);
        assert_eq!(posts[0].platform_post_id, "3");
    }

    #[test]
    fn bad_timestamp_becomes_none() {
        let posts = parse_flat_timeline(timeline(json!({
            "tweets": [{ "id": "1", "text": "t", "created_at": "yesterday" }]
        })));
        assert!(posts[0].posted_at.is_none());
    }

    #[test]
    fn empty_body_yields_empty_batch() {
        let posts = parse_flat_timeline(timeline(json!({})));
        assert!(posts.is_empty());
    }
}
