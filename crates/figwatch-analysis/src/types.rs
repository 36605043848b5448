use std::time::Duration;

use chrono::{DateTime, Utc};
use figwatch_core::AppConfig;

/// Sentiment label plus confidence score in [0.0, 1.0].
#[derive(Debug, Clone, PartialEq)]
pub struct Sentiment {
    /// One of `positive`, `negative`, `neutral`.
    pub label: String,
    pub score: f64,
}

impl Default for Sentiment {
    fn default() -> Self {
        Self {
            label: "neutral".to_string(),
            score: 0.5,
        }
    }
}

/// What the analyzer needs to know about a post.
#[derive(Debug, Clone)]
pub struct AnalysisInput {
    pub content: String,
    pub author_name: String,
    pub author_title: Option<String>,
    pub posted_at: Option<DateTime<Utc>>,
}

/// The complete analysis result. Always fully populated — fields fall back
/// to safe defaults when a backend fails.
#[derive(Debug, Clone)]
pub struct PostAnalysis {
    pub sentiment: Sentiment,
    pub summary: String,
    /// Controlled-vocabulary market tags; anything outside the vocabulary
    /// was discarded.
    pub tags: Vec<String>,
    /// Clamped to [0.0, 1.0]; 0.5 when the backend gave nothing usable.
    pub impact_score: f64,
    pub context: String,
}

/// Construction parameters for [`crate::LlmAnalyzer`].
#[derive(Debug, Clone)]
pub struct AnalyzerConfig {
    pub chat_base_url: String,
    pub chat_api_key: String,
    pub chat_model: String,
    pub textgen_base_url: String,
    pub textgen_api_key: String,
    pub textgen_model: String,
    /// Per-call bound on every backend request.
    pub request_timeout: Duration,
}

impl AnalyzerConfig {
    #[must_use]
    pub fn from_app_config(config: &AppConfig) -> Self {
        Self {
            chat_base_url: config.chat_base_url.clone(),
            chat_api_key: config.chat_api_key.clone(),
            chat_model: config.chat_model.clone(),
            textgen_base_url: config.textgen_base_url.clone(),
            textgen_api_key: config.textgen_api_key.clone(),
            textgen_model: config.textgen_model.clone(),
            request_timeout: Duration::from_secs(config.analyzer_request_timeout_secs),
        }
    }
}
