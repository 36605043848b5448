//! Parser for the nested GraphQL-like timeline envelope:
//! `data.user.result.timeline.instructions[].entries[].content.itemContent
//! .tweet_results.result.{rest_id, legacy{full_text, created_at, counts}}`.
//!
//! This shape coexists with the flat one (`parse.rs`); which one an upstream
//! deployment answers with is a config choice, not a version ordering.

use chrono::{DateTime, Utc};
use serde::Deserialize;

use crate::types::{PostMetrics, RawPost};

#[derive(Debug, Deserialize)]
pub(crate) struct GraphqlTimeline {
    pub data: Option<GraphqlData>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct GraphqlData {
    pub user: Option<GraphqlUser>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct GraphqlUser {
    pub result: Option<GraphqlUserResult>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct GraphqlUserResult {
    pub timeline: Option<Timeline>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct Timeline {
    #[serde(default)]
    pub instructions: Vec<Instruction>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct Instruction {
    #[serde(default)]
    pub entries: Vec<Entry>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct Entry {
    pub content: Option<EntryContent>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct EntryContent {
    #[serde(rename = "itemContent")]
    pub item_content: Option<ItemContent>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ItemContent {
    pub tweet_results: Option<TweetResults>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct TweetResults {
    pub result: Option<TweetResult>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct TweetResult {
    pub rest_id: Option<String>,
    pub legacy: Option<TweetLegacy>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct TweetLegacy {
    pub full_text: Option<String>,
    pub created_at: Option<String>,
    #[serde(default)]
    pub favorite_count: u32,
    #[serde(default)]
    pub retweet_count: u32,
    #[serde(default)]
    pub reply_count: u32,
}

/// Flatten the nested envelope into raw posts, skipping malformed entries.
///
/// Non-tweet entries (cursors, promoted modules) simply deserialize with
/// missing branches and are dropped without error.
pub(crate) fn parse_graphql_timeline(timeline: GraphqlTimeline) -> Vec<RawPost> {
    let instructions = timeline
        .data
        .and_then(|d| d.user)
        .and_then(|u| u.result)
        .and_then(|r| r.timeline)
        .map(|t| t.instructions)
        .unwrap_or_default();

    instructions
        .into_iter()
        .flat_map(|instruction| instruction.entries)
        .filter_map(|entry| {
            let result = entry
                .content?
                .item_content?
                .tweet_results?
                .result?;
            let id = result.rest_id.filter(|id| !id.is_empty())?;
            let legacy = result.legacy?;
            let content = legacy.full_text.filter(|text| !text.is_empty())?;

            Some(RawPost {
                platform_post_id: id,
                content,
                posted_at: legacy.created_at.as_deref().and_then(parse_twitter_timestamp),
                metrics: PostMetrics {
                    likes: legacy.favorite_count,
                    retweets: legacy.retweet_count,
                    replies: legacy.reply_count,
                },
            })
        })
        .collect()
}

/// Parse the legacy timestamp format, e.g. `Wed Oct 10 20:19:24 +0000 2018`.
fn parse_twitter_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_str(raw, "%a %b %d %H:%M:%S %z %Y")
        .ok()
        .map(|dt| dt.with_timezone(&Utc))
}
