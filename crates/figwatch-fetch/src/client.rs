//! Primary post source: a hosted timeline-scraping API.
//!
//! Wraps `reqwest` with bearer auth, a fixed-delay retry budget, and two
//! selectable response-shape parsers. After the budget is exhausted the
//! source either runs the page-scrape fallback once or yields an empty
//! batch — transient upstream failure is never surfaced as an error.

use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, AUTHORIZATION};
use reqwest::Client;
use serde::Deserialize;

use figwatch_core::{AppConfig, ResponseShape};

use crate::error::FetchError;
use crate::parse::{id_to_string, parse_flat_timeline, FlatTimeline};
use crate::parse_graphql::{parse_graphql_timeline, GraphqlTimeline};
use crate::scrape;
use crate::source::PostSource;
use crate::types::{RawPost, UserProfile};

/// Construction parameters for [`ApiTimelineSource`].
#[derive(Debug, Clone)]
pub struct SourceConfig {
    pub base_url: String,
    pub api_key: String,
    /// Bounded page size passed to the API (`count` parameter).
    pub page_size: u32,
    /// Total attempts against the primary API before giving up.
    pub max_retries: u32,
    /// Fixed delay between attempts. No jitter, no backoff growth.
    pub retry_delay: Duration,
    pub request_timeout: Duration,
    pub response_shape: ResponseShape,
    /// Run the page-scrape fallback once after retry exhaustion.
    pub use_page_fallback: bool,
    pub web_base_url: String,
}

impl SourceConfig {
    #[must_use]
    pub fn from_app_config(config: &AppConfig) -> Self {
        Self {
            base_url: config.source_base_url.clone(),
            api_key: config.source_api_key.clone(),
            page_size: config.source_page_size,
            max_retries: config.source_max_retries,
            retry_delay: Duration::from_secs(config.source_retry_delay_secs),
            request_timeout: Duration::from_secs(config.source_request_timeout_secs),
            response_shape: config.source_response_shape,
            use_page_fallback: config.source_use_page_fallback,
            web_base_url: config.source_web_base_url.clone(),
        }
    }
}

pub struct ApiTimelineSource {
    client: Client,
    config: SourceConfig,
}

impl ApiTimelineSource {
    /// Create a source with bearer auth and the configured timeout.
    ///
    /// # Errors
    ///
    /// Returns [`FetchError::InvalidBaseUrl`] if the API key is not a valid
    /// header value, or [`FetchError::Http`] if the underlying
    /// `reqwest::Client` cannot be constructed.
    pub fn new(config: SourceConfig) -> Result<Self, FetchError> {
        let mut headers = HeaderMap::new();
        let auth = HeaderValue::from_str(&format!("Bearer {}", config.api_key)).map_err(|e| {
            FetchError::InvalidBaseUrl {
                url: config.base_url.clone(),
                reason: format!("api key is not a valid header value: {e}"),
            }
        })?;
        headers.insert(AUTHORIZATION, auth);
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

        let client = Client::builder()
            .timeout(config.request_timeout)
            .connect_timeout(Duration::from_secs(10))
            .default_headers(headers)
            .build()?;

        Ok(Self { client, config })
    }

    fn timeline_url(&self, platform_id: &str, since: Option<DateTime<Utc>>) -> String {
        let base = self.config.base_url.trim_end_matches('/');
        let mut url = format!(
            "{base}/twitter/user-tweets?username={platform_id}&count={}",
            self.config.page_size
        );
        if let Some(since) = since {
            // Z-suffixed so the value stays URL-safe (no '+').
            url.push_str(&format!(
                "&since={}",
                since.to_rfc3339_opts(chrono::SecondsFormat::Secs, true)
            ));
        }
        url
    }

    /// One attempt against the primary API.
    async fn fetch_page(
        &self,
        platform_id: &str,
        since: Option<DateTime<Utc>>,
    ) -> Result<Vec<RawPost>, FetchError> {
        let url = self.timeline_url(platform_id, since);
        let response = self.client.get(&url).send().await?;

        if !response.status().is_success() {
            return Err(FetchError::UnexpectedStatus {
                status: response.status().as_u16(),
                url,
            });
        }

        let body: serde_json::Value = response.json().await?;

        let posts = match self.config.response_shape {
            ResponseShape::Flat => {
                let timeline: FlatTimeline =
                    serde_json::from_value(body).map_err(|e| FetchError::Deserialize {
                        context: format!("user-tweets({platform_id})"),
                        source: e,
                    })?;
                parse_flat_timeline(timeline)
            }
            ResponseShape::Graphql => {
                let timeline: GraphqlTimeline =
                    serde_json::from_value(body).map_err(|e| FetchError::Deserialize {
                        context: format!("user-tweets({platform_id})"),
                        source: e,
                    })?;
                parse_graphql_timeline(timeline)
            }
        };

        Ok(posts)
    }
}

#[derive(Debug, Deserialize)]
struct ProfileResponse {
    user: Option<ProfileUser>,
}

#[derive(Debug, Deserialize)]
struct ProfileUser {
    id: Option<serde_json::Value>,
    name: Option<String>,
    username: Option<String>,
    followers_count: Option<u64>,
    following_count: Option<u64>,
}

#[async_trait]
impl PostSource for ApiTimelineSource {
    async fn fetch_posts(
        &self,
        platform_id: &str,
        since: Option<DateTime<Utc>>,
    ) -> Result<Vec<RawPost>, FetchError> {
        let max_retries = self.config.max_retries.max(1);

        for attempt in 1..=max_retries {
            match self.fetch_page(platform_id, since).await {
                Ok(posts) => return Ok(posts),
                Err(e) => {
                    tracing::warn!(
                        platform_id,
                        attempt,
                        max_retries,
                        error = %e,
                        "timeline fetch attempt failed"
                    );
                    if attempt < max_retries {
                        tokio::time::sleep(self.config.retry_delay).await;
                    }
                }
            }
        }

        if self.config.use_page_fallback {
            tracing::warn!(platform_id, "retry budget exhausted, trying page fallback");
            return Ok(scrape::fetch_profile_timeline(
                &self.client,
                &self.config.web_base_url,
                platform_id,
            )
            .await);
        }

        Ok(Vec::new())
    }

    async fn user_info(&self, platform_id: &str) -> Result<Option<UserProfile>, FetchError> {
        let base = self.config.base_url.trim_end_matches('/');
        let url = format!("{base}/twitter/user-profile?username={platform_id}");

        let response = match self.client.get(&url).send().await {
            Ok(r) => r,
            Err(e) => {
                tracing::warn!(platform_id, error = %e, "profile lookup failed");
                return Ok(None);
            }
        };

        if !response.status().is_success() {
            tracing::warn!(
                platform_id,
                status = response.status().as_u16(),
                "profile lookup returned non-success status"
            );
            return Ok(None);
        }

        let body: ProfileResponse = match response.json().await {
            Ok(b) => b,
            Err(e) => {
                tracing::warn!(platform_id, error = %e, "profile body was not parseable");
                return Ok(None);
            }
        };

        let Some(user) = body.user else {
            return Ok(None);
        };
        let Some(id) = user.id.as_ref().and_then(id_to_string) else {
            return Ok(None);
        };

        Ok(Some(UserProfile {
            id,
            name: user.name,
            username: user.username,
            followers_count: user.followers_count,
            following_count: user.following_count,
        }))
    }
}
