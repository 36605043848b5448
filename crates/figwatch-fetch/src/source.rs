use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::error::FetchError;
use crate::types::{RawPost, UserProfile};

/// A source of posts for a monitored account on some platform.
///
/// Implementations are selected at construction time from config; the poller
/// holds one behind `Arc<dyn PostSource>`. Transient upstream failure is
/// absorbed into an empty batch — an `Err` from `fetch_posts` means something
/// the source could not paper over, and callers must isolate it per entity.
#[async_trait]
pub trait PostSource: Send + Sync {
    /// Fetch recent posts for the account, in source-provided order.
    ///
    /// `since` is advisory: it is passed to the primary strategy as a lower
    /// bound, but fallback strategies need not honor it. Overlap with
    /// previously fetched posts is expected and handled by dedup downstream.
    async fn fetch_posts(
        &self,
        platform_id: &str,
        since: Option<DateTime<Utc>>,
    ) -> Result<Vec<RawPost>, FetchError>;

    /// Look up public profile data for the account, if available.
    async fn user_info(&self, platform_id: &str) -> Result<Option<UserProfile>, FetchError>;
}
