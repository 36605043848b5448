//! Secondary fetch strategy: the public syndication timeline.
//!
//! Used at most once per fetch, after the primary API has exhausted its
//! retry budget. Does not honor a `since` bound and carries no engagement
//! metrics. Any failure here yields an empty batch — the fallback never
//! propagates errors.

use reqwest::Client;
use serde::Deserialize;

use crate::parse::parse_timestamp;
use crate::types::{PostMetrics, RawPost};

#[derive(Debug, Deserialize)]
struct SyndicationResponse {
    timeline: Option<SyndicationTimeline>,
}

#[derive(Debug, Deserialize)]
struct SyndicationTimeline {
    #[serde(default)]
    entries: Vec<SyndicationEntry>,
}

#[derive(Debug, Deserialize)]
struct SyndicationEntry {
    tweet: Option<SyndicationTweet>,
}

#[derive(Debug, Deserialize)]
struct SyndicationTweet {
    id_str: Option<String>,
    text: Option<String>,
    created_at: Option<String>,
}

/// Fetch the public syndication timeline for a username.
///
/// Returns an empty vec on any transport, status, or parse failure, logging
/// a warning with the cause.
pub(crate) async fn fetch_profile_timeline(
    client: &Client,
    web_base_url: &str,
    username: &str,
) -> Vec<RawPost> {
    let url = format!(
        "{}/timeline/profile/{username}?format=json",
        web_base_url.trim_end_matches('/')
    );

    let response = match client.get(&url).send().await {
        Ok(r) => r,
        Err(e) => {
            tracing::warn!(username, error = %e, "page fallback request failed");
            return Vec::new();
        }
    };

    if !response.status().is_success() {
        tracing::warn!(
            username,
            status = response.status().as_u16(),
            "page fallback returned non-success status"
        );
        return Vec::new();
    }

    let body: SyndicationResponse = match response.json().await {
        Ok(b) => b,
        Err(e) => {
            tracing::warn!(username, error = %e, "page fallback body was not parseable");
            return Vec::new();
        }
    };

    let entries = body.timeline.map(|t| t.entries).unwrap_or_default();

    entries
        .into_iter()
        .filter_map(|entry| {
            let tweet = entry.tweet?;
            let id = tweet.id_str.filter(|id| !id.is_empty())?;
            let content = tweet.text.filter(|text| !text.is_empty())?;
            Some(RawPost {
                platform_post_id: id,
                content,
                posted_at: tweet.created_at.as_deref().and_then(parse_timestamp),
                metrics: PostMetrics::default(),
            })
        })
        .collect()
}
