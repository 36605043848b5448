use chrono::{DateTime, Utc};

/// Engagement counters attached to a fetched post. Always non-negative.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PostMetrics {
    pub likes: u32,
    pub retweets: u32,
    pub replies: u32,
}

/// A fetched, not-yet-persisted post.
///
/// Produced by a [`crate::PostSource`], consumed immediately by the poller.
#[derive(Debug, Clone)]
pub struct RawPost {
    /// Platform-native post identifier — the dedup key downstream.
    pub platform_post_id: String,
    pub content: String,
    pub posted_at: Option<DateTime<Utc>>,
    pub metrics: PostMetrics,
}

/// Public profile data for a monitored account.
#[derive(Debug, Clone)]
pub struct UserProfile {
    pub id: String,
    pub name: Option<String>,
    pub username: Option<String>,
    pub followers_count: Option<u64>,
    pub following_count: Option<u64>,
}
